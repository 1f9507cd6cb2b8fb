//! Polling change-notification source.
//!
//! Each tick is a payload-free "check me" event for one repository. Ticks for an
//! unchanged branch cost one branch lookup in the coordinator's no-op path.

use crate::core::{coordinator::TransitionCoordinator, git::Repository};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Default poll period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct HeadWatcher {
    coordinator: Arc<TransitionCoordinator>,
    repo: Arc<dyn Repository>,
    interval: Duration,
}

impl HeadWatcher {
    pub fn new(
        coordinator: Arc<TransitionCoordinator>,
        repo: Arc<dyn Repository>,
        interval: Duration,
    ) -> Self {
        Self {
            coordinator,
            repo,
            interval,
        }
    }

    /// Poll forever. Failed transitions are logged and polling continues.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::debug!(
            "Watching {} every {}ms",
            self.repo.root().display(),
            self.interval.as_millis()
        );
        loop {
            ticker.tick().await;
            if let Err(e) = self.coordinator.notify(self.repo.as_ref()).await {
                log::error!("Failed to sync tabs for {}: {e}", self.repo.root().display());
            }
        }
    }
}
