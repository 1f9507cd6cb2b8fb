//! Centralized initialization shared by all commands.
//!
//! Every command needs the same setup: resolve the workspace the persisted
//! state is scoped to, open the workspace's [`BranchStateStore`] and discover
//! the repositories named on the command line. [`WorkspaceInit`] does this once
//! so the command bodies only deal with their own behavior.
//!
//! # Initialization Steps
//! 1. **Workspace resolution**: `--workspace` or the current directory, made absolute
//! 2. **Store opening**: JSON state file under the cache directory, keyed by workspace
//! 3. **Repository discovery**: each `--repo` path (default: current directory)

use crate::core::{
    config::{FileSettings, RestoreBehavior, SettingsProvider},
    coordinator::TransitionCoordinator,
    error::Result,
    git::{GitRepo, Repository},
    paths::{normalize_path, RepositoryKey},
    recency::RecencyClassifier,
    replay::TabReplayEngine,
    session::SessionFileSurface,
    store::{BranchStateStore, JsonFileBackend},
};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Initialized context for one command invocation
pub struct WorkspaceContext {
    pub workspace: PathBuf,
    pub store: Arc<BranchStateStore>,
}

pub struct WorkspaceInit;

impl WorkspaceInit {
    /// Resolve the workspace and open its store
    pub fn initialize(workspace: Option<&Path>) -> Result<WorkspaceContext> {
        let workspace = absolute(workspace.unwrap_or(Path::new(".")))?;
        let backend = JsonFileBackend::for_workspace(&workspace)?;
        log::debug!(
            "Workspace {} uses state file {}",
            workspace.display(),
            backend.path().display()
        );
        Ok(WorkspaceContext {
            workspace,
            store: Arc::new(BranchStateStore::new(backend)),
        })
    }

    /// Discover the repositories at `paths`, the current directory when empty.
    ///
    /// Paths inside the same repository yield it once.
    pub fn open_repositories(paths: &[PathBuf]) -> Result<Vec<Arc<GitRepo>>> {
        let current_dir = [PathBuf::from(".")];
        let paths = if paths.is_empty() { &current_dir[..] } else { paths };

        let mut seen: HashSet<RepositoryKey> = HashSet::new();
        let mut repos = Vec::new();
        for path in paths {
            let repo = GitRepo::open(absolute(path)?)?;
            if seen.insert(repo.key()) {
                log::debug!("Discovered repository {}", repo.key());
                repos.push(Arc::new(repo));
            } else {
                log::debug!("Skipping duplicate repository {}", repo.key());
            }
        }
        Ok(repos)
    }
}

impl WorkspaceContext {
    /// Build a coordinator that drives the session file at `session`.
    ///
    /// Without an explicit `restore_behavior` the user settings file is
    /// consulted on every replay.
    pub fn coordinator(
        &self,
        session: &Path,
        restore_behavior: Option<RestoreBehavior>,
        classifier: RecencyClassifier,
    ) -> Result<TransitionCoordinator> {
        let surface = Arc::new(SessionFileSurface::new(absolute(session)?));
        let settings: Arc<dyn SettingsProvider> = match restore_behavior {
            Some(behavior) => Arc::new(behavior),
            None => Arc::new(FileSettings::user()?),
        };
        Ok(TransitionCoordinator::new(
            self.store.clone(),
            surface.clone(),
            TabReplayEngine::new(surface, settings),
            classifier,
        ))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_path(path))
    } else {
        Ok(normalize_path(&env::current_dir()?.join(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_repositories_outside_git_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = WorkspaceInit::open_repositories(&[temp_dir.path().to_path_buf()]);
        assert!(result.is_err());
        match result {
            Err(e) => assert!(e.to_string().contains("Not in a git repository")),
            Ok(_) => panic!("Expected error, but got success"),
        }
    }

    #[test]
    fn test_open_repositories_deduplicates() -> Result<()> {
        let temp_dir = TempDir::new()?;
        std::process::Command::new("git")
            .args(["init"])
            .current_dir(temp_dir.path())
            .output()?;
        let nested = temp_dir.path().join("src");
        std::fs::create_dir_all(&nested)?;

        let repos =
            WorkspaceInit::open_repositories(&[temp_dir.path().to_path_buf(), nested])?;
        assert_eq!(repos.len(), 1);
        Ok(())
    }

    #[test]
    fn test_absolute_normalizes() -> Result<()> {
        assert_eq!(absolute(Path::new("/a/./b/../c/"))?, PathBuf::from("/a/c"));
        assert!(absolute(Path::new("relative/dir"))?.is_absolute());
        Ok(())
    }
}
