//! Tab replay.
//!
//! Replaying a branch closes every tab of the repository in one batch and then
//! reopens the saved files. The order and focus of the open calls depend on the
//! configured [`RestoreBehavior`]:
//!
//! - **preserveTabOrder**: every file in saved order with focus suppressed,
//!   then the focus file once more with focus, so the tab strip matches the
//!   saved order and the saved focus target ends up focused.
//! - **focusActiveTabFirst**: the focus file first with focus, then the rest
//!   in saved order with focus suppressed.
//!
//! Only tabs under the repository root are touched, so replays of different
//! repositories operate on disjoint tab sets.

use crate::core::{
    config::{RestoreBehavior, SettingsProvider},
    error::Result,
    paths::RepositoryKey,
    state::BranchTabState,
    surface::{tabs_under, EditorSurface, OpenOptions},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One planned open call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenStep {
    pub path: PathBuf,
    pub options: OpenOptions,
}

/// Outcome of one replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub closed: usize,
    pub opened: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Order the open calls for `state` under `behavior`.
pub fn plan_opens(state: &BranchTabState, behavior: RestoreBehavior) -> Vec<OpenStep> {
    let Some(focus) = state.focus_file() else {
        return Vec::new();
    };
    let background = |path: &PathBuf| OpenStep {
        path: path.clone(),
        options: OpenOptions::background(),
    };
    let focused = OpenStep {
        path: focus.to_path_buf(),
        options: OpenOptions::focused(),
    };

    match behavior {
        RestoreBehavior::PreserveTabOrder => {
            let mut steps: Vec<OpenStep> = state.files.iter().map(background).collect();
            steps.push(focused);
            steps
        }
        RestoreBehavior::FocusActiveTabFirst => std::iter::once(focused)
            .chain(
                state
                    .files
                    .iter()
                    .filter(|path| path.as_path() != focus)
                    .map(background),
            )
            .collect(),
    }
}

pub struct TabReplayEngine {
    surface: Arc<dyn EditorSurface>,
    settings: Arc<dyn SettingsProvider>,
    order_warning_shown: AtomicBool,
}

impl TabReplayEngine {
    pub fn new(surface: Arc<dyn EditorSurface>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self {
            surface,
            settings,
            order_warning_shown: AtomicBool::new(false),
        }
    }

    /// Replace the repository's tabs with `state`; `None` only closes them.
    pub async fn replay(
        &self,
        repo: &RepositoryKey,
        state: Option<&BranchTabState>,
    ) -> Result<ReplayReport> {
        let empty = BranchTabState::default();
        let state = state.unwrap_or(&empty);
        let mut report = ReplayReport::default();

        let to_close = tabs_under(self.surface.as_ref(), repo.as_path())?;
        if !to_close.is_empty() {
            match self.surface.close_tabs(&to_close).await {
                Ok(()) => report.closed = to_close.len(),
                Err(e) => log::warn!("Failed to close {} tab(s) of {repo}: {e}", to_close.len()),
            }
        }

        let behavior = self.settings.restore_behavior();
        if behavior == RestoreBehavior::FocusActiveTabFirst
            && !self.order_warning_shown.swap(true, Ordering::Relaxed)
        {
            log::warn!("focusActiveTabFirst restores focus first and does not keep the saved tab order");
        }

        for step in plan_opens(state, behavior) {
            match self.surface.open_document(&step.path, step.options).await {
                Ok(()) => report.opened.push(step.path),
                Err(e) => {
                    log::warn!("Skipping '{}': {e}", step.path.display());
                    report.failed.push(step.path);
                }
            }
        }

        log::info!(
            "Restored {} file(s) in {repo} ({} closed, {} failed, {behavior})",
            report.opened.len(),
            report.closed,
            report.failed.len()
        );
        Ok(report)
    }
}
