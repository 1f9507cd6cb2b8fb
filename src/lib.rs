//! Branch Tabs - remembers which files were open on every git branch.
//!
//! When a repository switches to a branch that was visited before, the tabs that
//! were open on that branch are restored in their saved order with the saved
//! focus. Freshly created branches leave the open tabs alone.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Transition detection and per-repository sequencing
//! - Persisted branch tab state with legacy schema support
//! - Tab replay against an editor surface
//! - Git repository handle and branch recency classification
//! - Error handling and result types

pub mod commands;
pub mod core;

pub use core::{
    // Branch state
    BranchFileMap,
    BranchStateStore,
    BranchTabState,
    // Error handling
    BranchTabsError,
    // Editor surface
    EditorSurface,
    // Git operations
    GitRepo,
    JsonFileBackend,
    MemoryBackend,
    NotifyOutcome,
    OpenOptions,
    RecencyClassifier,
    Repository,
    RepositoryKey,
    RestoreBehavior,
    Result,
    SessionFileSurface,
    SettingsProvider,
    StateBackend,
    TabReplayEngine,
    // Transition engine
    TransitionCoordinator,
};
