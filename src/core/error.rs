//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`BranchTabsError`] which covers every failure mode of the
//! branch-state synchronization engine. It uses `thiserror` for ergonomic error
//! definitions and includes small constructors for the errors that carry context.
//!
//! # Public API
//! - [`BranchTabsError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, BranchTabsError>`
//!
//! # Error Categories
//! - **Git operations**: Repository not found, missing reflog, git2 library errors
//! - **Persisted state**: Read, write and parse failures of the state file
//! - **Editor surface**: Session file and document open/close failures
//! - **Configuration**: Unknown restore behavior values

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for branch-tabs
#[derive(Error, Debug)]
pub enum BranchTabsError {
    // Git repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Repository at '{path}' has no working directory")]
    NoWorkingDirectory { path: PathBuf },

    #[error("No reference history for branch '{branch}'")]
    NoRefHistory { branch: String },

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    // File operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Persisted state errors
    #[error("Could not find cache directory")]
    CacheDirectoryNotFound,

    #[error("Failed to read state file '{path}': {source}")]
    StoreReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write state file '{path}': {source}")]
    StoreWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse state file '{path}': {source}")]
    StoreParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Stored branch state is malformed: {source}")]
    StoreDecodeFailed { source: serde_json::Error },

    #[error("Persisted state unavailable: {message}")]
    StoreUnavailable { message: String },

    // Editor surface errors
    #[error("Editor surface error: {message}")]
    Surface { message: String },

    #[error("Failed to open document '{path}': {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Failed to parse session file '{path}': {source}")]
    SessionParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    // Configuration errors
    #[error("Invalid restore behavior '{value}'. Use preserveTabOrder or focusActiveTabFirst")]
    InvalidRestoreBehavior { value: String },

    // JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using BranchTabsError
pub type Result<T> = std::result::Result<T, BranchTabsError>;

impl BranchTabsError {
    /// Create a missing reference history error
    pub fn no_ref_history(branch: impl Into<String>) -> Self {
        Self::NoRefHistory {
            branch: branch.into(),
        }
    }

    /// Create a state file read error
    pub fn store_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a state file write error
    pub fn store_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a state file parse error
    pub fn store_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::StoreParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a store unavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create an editor surface error
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Create a document open error
    pub fn open_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a session file parse error
    pub fn session_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::SessionParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid restore behavior error
    pub fn invalid_restore_behavior(value: impl Into<String>) -> Self {
        Self::InvalidRestoreBehavior {
            value: value.into(),
        }
    }
}
