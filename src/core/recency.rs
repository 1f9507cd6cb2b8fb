//! Branch recency classification.
//!
//! A checkout to a branch that was created (or force-updated) a moment ago is a
//! branch creation, not a switch: the user is still working on the files they
//! have open, so nothing should be replayed. The reflog of the branch tells the
//! two apart. When the reflog cannot be read the branch is classified recent,
//! which suppresses replay for that transition.

use crate::core::git::Repository;
use chrono::{DateTime, Duration, Utc};

/// Default window, in seconds, in which a branch update counts as "just happened".
pub const DEFAULT_RECENCY_SECS: i64 = 5;

#[derive(Debug, Clone, Copy)]
pub struct RecencyClassifier {
    threshold: Duration,
}

impl Default for RecencyClassifier {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_RECENCY_SECS))
    }
}

impl RecencyClassifier {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Whether `branch` was created or updated within the threshold.
    pub async fn is_recent(&self, repo: &dyn Repository, branch: &str) -> bool {
        match repo.last_ref_update(branch).await {
            Ok(updated_at) => self.classify(updated_at, Utc::now()),
            Err(e) => {
                log::warn!(
                    "No usable reference history for '{branch}' in {}: {e}; skipping restore",
                    repo.root().display()
                );
                true
            }
        }
    }

    /// Pure comparison of an update timestamp against `now`.
    pub fn classify(&self, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // A clock skewed into the future is still "just now".
        now.signed_duration_since(updated_at) <= self.threshold
    }
}
