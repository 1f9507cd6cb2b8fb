//! Branch transition detection and sequencing.
//!
//! [`TransitionCoordinator`] is constructed once per workspace and owns the two
//! pieces of process-lifetime state: the last branch observed per repository
//! and the per-repository run state that keeps transition processing
//! sequential.
//!
//! # Run states
//! Each repository is `Idle` (no entry), `Processing` or
//! `ProcessingWithPending`. A notification for an idle repository runs the
//! transition routine; a notification for a busy one only marks it pending and
//! returns. When a run finishes with the pending mark set, the mark is cleared
//! and the routine runs once more, so any number of notifications that arrive
//! during a run collapse into a single re-check. Repositories never wait on
//! each other.
//!
//! # Transition routine
//! 1. Read the live branch; unchanged → nothing to do.
//! 2. Snapshot the repository's open files and focus, save them under the
//!    previous branch.
//! 3. Ask the [`RecencyClassifier`] about the new branch; a just-created branch
//!    is left alone.
//! 4. Otherwise replay the new branch's saved tabs.
//! 5. Advance the branch pointer, whatever happened in 2–4.

use crate::core::{
    error::Result,
    git::Repository,
    paths::RepositoryKey,
    recency::RecencyClassifier,
    replay::{ReplayReport, TabReplayEngine},
    state::BranchTabState,
    store::BranchStateStore,
    surface::{active_file, open_files, EditorSurface},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of a [`TransitionCoordinator::notify`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// This call ran the repository to a settled state.
    Settled,
    /// A run was already in flight; it will re-check once it finishes.
    Coalesced,
}

/// What one pass of the transition routine did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    SkippedRecent { from: String, to: String },
    Restored { from: String, to: String, report: ReplayReport },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Processing,
    ProcessingWithPending,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds a repository in `Processing` until the run settles.
///
/// Dropping an unsettled guard (panic or cancelled future) returns the
/// repository to `Idle`.
struct RunGuard<'a> {
    runs: &'a Mutex<HashMap<RepositoryKey, RunState>>,
    key: RepositoryKey,
    settled: bool,
}

impl RunGuard<'_> {
    /// Consume a pending mark and return true, or go back to `Idle` and
    /// return false. Both happen under one lock so a notification arriving
    /// in between is never dropped.
    fn take_pending(&mut self) -> bool {
        let mut runs = lock(self.runs);
        match runs.get_mut(&self.key) {
            Some(state @ RunState::ProcessingWithPending) => {
                *state = RunState::Processing;
                true
            }
            _ => {
                runs.remove(&self.key);
                self.settled = true;
                false
            }
        }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            lock(self.runs).remove(&self.key);
        }
    }
}

pub struct TransitionCoordinator {
    store: Arc<BranchStateStore>,
    surface: Arc<dyn EditorSurface>,
    replay: TabReplayEngine,
    classifier: RecencyClassifier,
    pointers: Mutex<HashMap<RepositoryKey, String>>,
    runs: Mutex<HashMap<RepositoryKey, RunState>>,
}

impl TransitionCoordinator {
    pub fn new(
        store: Arc<BranchStateStore>,
        surface: Arc<dyn EditorSurface>,
        replay: TabReplayEngine,
        classifier: RecencyClassifier,
    ) -> Self {
        Self {
            store,
            surface,
            replay,
            classifier,
            pointers: Mutex::new(HashMap::new()),
            runs: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &BranchStateStore {
        &self.store
    }

    /// Last branch observed for `key`.
    pub fn current_branch(&self, key: &RepositoryKey) -> Option<String> {
        lock(&self.pointers).get(key).cloned()
    }

    /// Record the live branch of a newly discovered repository.
    ///
    /// A repository that is already tracked keeps its pointer.
    pub async fn track(&self, repo: &dyn Repository) -> Result<String> {
        let key = repo.key();
        if let Some(branch) = self.current_branch(&key) {
            return Ok(branch);
        }
        let branch = repo.branch_name().await?;
        log::info!("Tracking {key} on branch '{branch}'");
        Ok(lock(&self.pointers).entry(key).or_insert(branch).clone())
    }

    /// Handle a "something changed" event for `repo`.
    ///
    /// Errors of individual passes are logged; the first one is returned once
    /// the repository has settled.
    pub async fn notify(&self, repo: &dyn Repository) -> Result<NotifyOutcome> {
        let Some(mut guard) = self.begin_run(repo.key()) else {
            log::debug!("Transition already running for {}, queued re-check", repo.key());
            return Ok(NotifyOutcome::Coalesced);
        };

        let mut first_error = None;
        loop {
            match self.process_transition(repo).await {
                Ok(transition) => log::debug!("{}: {transition:?}", guard.key),
                Err(e) => {
                    log::warn!("Branch transition in {} failed: {e}", guard.key);
                    first_error.get_or_insert(e);
                }
            }
            if !guard.take_pending() {
                break;
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(NotifyOutcome::Settled),
        }
    }

    /// Save the repository's current tabs under its current branch.
    pub async fn snapshot(&self, repo: &dyn Repository) -> Result<(String, BranchTabState)> {
        let key = repo.key();
        let branch = match self.current_branch(&key) {
            Some(branch) => branch,
            None => repo.branch_name().await?,
        };
        let state = self.capture(&key)?;
        self.store
            .update(|map| BranchStateStore::put(map, &key, &branch, state.clone()))
            .await?;
        Ok((branch, state))
    }

    fn begin_run(&self, key: RepositoryKey) -> Option<RunGuard<'_>> {
        let mut runs = lock(&self.runs);
        match runs.get(&key) {
            Some(_) => {
                runs.insert(key, RunState::ProcessingWithPending);
                None
            }
            None => {
                runs.insert(key.clone(), RunState::Processing);
                Some(RunGuard {
                    runs: &self.runs,
                    key,
                    settled: false,
                })
            }
        }
    }

    async fn process_transition(&self, repo: &dyn Repository) -> Result<Transition> {
        let key = repo.key();
        let live = repo.branch_name().await?;
        let previous = self.current_branch(&key).unwrap_or_default();
        if live == previous {
            return Ok(Transition::Unchanged);
        }

        log::info!("{key}: branch '{previous}' -> '{live}'");
        let result = self.settle(repo, &key, previous, &live).await;
        lock(&self.pointers).insert(key, live);
        result
    }

    async fn settle(
        &self,
        repo: &dyn Repository,
        key: &RepositoryKey,
        previous: String,
        live: &str,
    ) -> Result<Transition> {
        let target = if previous.is_empty() {
            self.store.load().await?.get(key, live).cloned()
        } else {
            let outgoing = self.capture(key)?;
            log::debug!(
                "Saving {} file(s) of '{previous}' in {key}",
                outgoing.files.len()
            );
            let mut target = None;
            self.store
                .update(|map| {
                    BranchStateStore::put(map, key, &previous, outgoing);
                    target = BranchStateStore::get(map, key, live).cloned();
                })
                .await?;
            target
        };

        if self.classifier.is_recent(repo, live).await {
            log::info!("Branch '{live}' in {key} was just created or updated, keeping open tabs");
            return Ok(Transition::SkippedRecent {
                from: previous,
                to: live.to_string(),
            });
        }

        let report = self.replay.replay(key, target.as_ref()).await?;
        Ok(Transition::Restored {
            from: previous,
            to: live.to_string(),
            report,
        })
    }

    fn capture(&self, key: &RepositoryKey) -> Result<BranchTabState> {
        let surface = self.surface.as_ref();
        Ok(BranchTabState::new(
            open_files(surface, key.as_path())?,
            active_file(surface, key.as_path())?,
        ))
    }
}
