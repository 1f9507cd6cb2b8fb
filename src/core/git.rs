//! Git repository handle.
//!
//! The engine only needs three things from a repository: its root, the name of
//! the branch the working copy points to, and when a branch reference was last
//! written. [`Repository`] captures that contract; [`GitRepo`] fulfils it with
//! `git2`, running every query on a blocking task.
//!
//! # Public API
//! - [`Repository`]: Async handle consumed by the coordinator and classifier
//! - [`GitRepo`]: `git2` backed implementation
//! - [`DETACHED_HEAD`]: Branch name used when HEAD is not symbolic

use crate::core::{
    error::{BranchTabsError, Result},
    paths::{normalize_path, RepositoryKey},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};

/// Sentinel branch name for a detached HEAD.
pub const DETACHED_HEAD: &str = "HEAD";

#[async_trait]
pub trait Repository: Send + Sync {
    /// Absolute path of the working copy root.
    fn root(&self) -> &Path;

    /// Symbolic branch name, `None` when HEAD is detached.
    async fn current_branch(&self) -> Result<Option<String>>;

    /// Time of the most recent reflog entry of `branch`.
    async fn last_ref_update(&self, branch: &str) -> Result<DateTime<Utc>>;

    fn key(&self) -> RepositoryKey {
        RepositoryKey::new(self.root())
    }

    /// Current branch name, [`DETACHED_HEAD`] when detached.
    async fn branch_name(&self) -> Result<String> {
        Ok(self
            .current_branch()
            .await?
            .unwrap_or_else(|| DETACHED_HEAD.to_string()))
    }
}

pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Discover the repository containing `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = git2::Repository::discover(path).map_err(|e| {
            log::debug!("Repository discovery failed: {e}");
            BranchTabsError::NotInGitRepo
        })?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| BranchTabsError::NoWorkingDirectory {
                path: repo.path().to_path_buf(),
            })?;
        Ok(GitRepo {
            root: normalize_path(workdir),
        })
    }

    fn repository(&self) -> Result<git2::Repository> {
        Ok(git2::Repository::open(&self.root)?)
    }

    fn read_current_branch(&self) -> Result<Option<String>> {
        let repo = self.repository()?;
        if repo.head_detached()? {
            return Ok(None);
        }
        // An unborn branch has no HEAD target yet but still a symbolic name.
        let head = repo.find_reference("HEAD")?;
        let name = head
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string);
        Ok(name)
    }

    fn read_last_ref_update(&self, branch: &str) -> Result<DateTime<Utc>> {
        let repo = self.repository()?;
        let reference = if branch == DETACHED_HEAD {
            DETACHED_HEAD.to_string()
        } else {
            format!("refs/heads/{branch}")
        };
        let reflog = repo.reflog(&reference)?;
        // Index 0 is the most recent entry.
        let entry = reflog
            .get(0)
            .ok_or_else(|| BranchTabsError::no_ref_history(branch))?;
        let seconds = entry.committer().when().seconds();
        Utc.timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| BranchTabsError::no_ref_history(branch))
    }
}

#[async_trait]
impl Repository for GitRepo {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        let repo = GitRepo {
            root: self.root.clone(),
        };
        tokio::task::spawn_blocking(move || repo.read_current_branch()).await?
    }

    async fn last_ref_update(&self, branch: &str) -> Result<DateTime<Utc>> {
        let repo = GitRepo {
            root: self.root.clone(),
        };
        let branch = branch.to_string();
        tokio::task::spawn_blocking(move || repo.read_last_ref_update(&branch)).await?
    }
}
