//! Branch tab state data structures.
//!
//! This module defines the records persisted per (repository, branch) pair and
//! the full map that holds them.
//!
//! # Public API
//! - [`BranchTabState`]: Ordered open files and the focused file of one branch
//! - [`BranchFileMap`]: Repository → branch → [`BranchTabState`]
//!
//! # Schema Versions
//! - **Tracked** (current): `{"files": [...], "activeFile": "..." | null}`
//! - **Legacy**: a bare array of paths without focus information
//!
//! Both shapes decode into [`BranchTabState`]; only the tracked shape is ever
//! serialized.

use crate::core::paths::RepositoryKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Saved tab arrangement of one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredBranchState")]
pub struct BranchTabState {
    pub files: Vec<PathBuf>,
    #[serde(rename = "activeFile")]
    pub active_file: Option<PathBuf>,
}

/// Every persisted shape a branch entry has had.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBranchState {
    Tracked {
        files: Vec<PathBuf>,
        #[serde(rename = "activeFile", default)]
        active_file: Option<PathBuf>,
    },
    Legacy(Vec<PathBuf>),
}

impl From<StoredBranchState> for BranchTabState {
    fn from(stored: StoredBranchState) -> Self {
        match stored {
            StoredBranchState::Tracked { files, active_file } => Self { files, active_file },
            StoredBranchState::Legacy(files) => Self {
                files,
                active_file: None,
            },
        }
    }
}

impl BranchTabState {
    pub fn new(files: Vec<PathBuf>, active_file: Option<PathBuf>) -> Self {
        Self { files, active_file }
    }

    /// The file that should end up focused after a replay.
    ///
    /// The saved active file wins when it is still one of `files`; a stale hint
    /// falls back to the first file.
    pub fn focus_file(&self) -> Option<&Path> {
        self.active_file
            .as_deref()
            .filter(|active| self.files.iter().any(|file| file == active))
            .or_else(|| self.files.first().map(PathBuf::as_path))
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Full persisted state: repository → branch → saved tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchFileMap {
    repositories: BTreeMap<RepositoryKey, BTreeMap<String, BranchTabState>>,
}

impl BranchFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, repo: &RepositoryKey, branch: &str) -> Option<&BranchTabState> {
        self.repositories.get(repo).and_then(|branches| branches.get(branch))
    }

    /// Insert or overwrite the state of `branch`, creating the repository entry if needed.
    pub fn insert(&mut self, repo: RepositoryKey, branch: impl Into<String>, state: BranchTabState) {
        self.repositories
            .entry(repo)
            .or_default()
            .insert(branch.into(), state);
    }

    /// All saved branches of a repository, sorted by name.
    pub fn branches(&self, repo: &RepositoryKey) -> impl Iterator<Item = (&str, &BranchTabState)> {
        self.repositories
            .get(repo)
            .into_iter()
            .flat_map(|branches| branches.iter().map(|(name, state)| (name.as_str(), state)))
    }

    pub fn repositories(&self) -> impl Iterator<Item = &RepositoryKey> {
        self.repositories.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
