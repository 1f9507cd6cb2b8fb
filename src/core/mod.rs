//! Core functionality for the branch-tabs engine.
//!
//! This module provides the building blocks for tracking branch transitions,
//! persisting per-branch tab state and replaying it against an editor surface.

pub mod command_init;
pub mod config;
pub mod coordinator;
pub mod dirs;
pub mod error;
pub mod git;
pub mod output;
pub mod paths;
pub mod recency;
pub mod replay;
pub mod session;
pub mod state;
pub mod store;
pub mod surface;
pub mod watcher;

// === Error handling ===
pub use error::{BranchTabsError, Result};

// === Paths ===
// Normalization and repository membership
pub use paths::{is_under, normalize_path, RepositoryKey};

// === Repository handle ===
pub use git::{GitRepo, Repository, DETACHED_HEAD};

// === Branch state ===
pub use state::{BranchFileMap, BranchTabState};
pub use store::{BranchStateStore, JsonFileBackend, MemoryBackend, StateBackend, BRANCH_STATE_KEY};

// === Editor surface ===
pub use session::{SessionFile, SessionFileSurface};
pub use surface::{
    active_file, open_files, tabs_under, EditorSurface, OpenOptions, Tab, TabGroup, TabHandle,
    TabKind,
};

// === Command initialization ===
pub use command_init::{WorkspaceContext, WorkspaceInit};

// === Transition engine ===
pub use config::{FileSettings, RestoreBehavior, Settings, SettingsProvider};
pub use coordinator::{NotifyOutcome, Transition, TransitionCoordinator};
pub use recency::{RecencyClassifier, DEFAULT_RECENCY_SECS};
pub use replay::{plan_opens, OpenStep, ReplayReport, TabReplayEngine};
pub use watcher::{HeadWatcher, DEFAULT_POLL_INTERVAL};

// === Output formatting ===
pub use output::{print_error, print_info, print_section_header, print_success};
