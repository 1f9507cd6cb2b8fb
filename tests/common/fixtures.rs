//! In-memory collaborators for the transition engine
//!
//! - [`RecordingSurface`]: editor surface that records every open and close call
//! - [`ScriptedRepo`]: repository whose branch and reflog times are set by the test
//! - [`FailingBackend`]: persisted state that rejects every read and write
//! - [`YieldingBackend`]: persisted state that suspends on every call

#![allow(dead_code)]

use async_trait::async_trait;
use branch_tabs::core::{
    error::{BranchTabsError, Result},
    BranchStateStore, EditorSurface, MemoryBackend, OpenOptions, RecencyClassifier, Repository,
    RestoreBehavior, StateBackend, Tab, TabGroup, TabHandle, TabKind, TabReplayEngine,
    TransitionCoordinator,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCall {
    pub path: PathBuf,
    pub preserve_focus: bool,
}

#[derive(Default)]
struct SurfaceState {
    groups: Vec<Vec<(TabKind, PathBuf)>>,
    active_tabs: Vec<Option<usize>>,
    active_group: Option<usize>,
    active_editor: Option<PathBuf>,
    opens: Vec<OpenCall>,
    closes: Vec<Vec<PathBuf>>,
    missing: HashSet<PathBuf>,
}

/// Editor surface that keeps its tabs in memory and records every call.
#[derive(Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceState>,
}

impl RecordingSurface {
    /// One tab group with the given text files; the last one is focused.
    pub fn with_files(files: &[&str]) -> Self {
        let surface = Self::default();
        surface.add_group(files);
        if let Some(last) = files.last() {
            surface.focus(last);
        }
        surface
    }

    pub fn add_group(&self, files: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state
            .groups
            .push(files.iter().map(|f| (TabKind::Text, PathBuf::from(f))).collect());
        state.active_tabs.push(None);
        if state.active_group.is_none() {
            state.active_group = Some(0);
        }
    }

    /// Focus the editor of `path` and make its tab active.
    pub fn focus(&self, path: &str) {
        let mut state = self.state.lock().unwrap();
        let path = PathBuf::from(path);
        let found = state.groups.iter().enumerate().find_map(|(g, tabs)| {
            tabs.iter().position(|(_, p)| *p == path).map(|i| (g, i))
        });
        if let Some((group, index)) = found {
            state.active_tabs[group] = Some(index);
            state.active_group = Some(group);
        }
        state.active_editor = Some(path);
    }

    /// Make opening `path` fail, as for a file deleted since it was saved.
    pub fn mark_missing(&self, path: &str) {
        self.state.lock().unwrap().missing.insert(PathBuf::from(path));
    }

    pub fn opens(&self) -> Vec<OpenCall> {
        self.state.lock().unwrap().opens.clone()
    }

    pub fn closes(&self) -> Vec<Vec<PathBuf>> {
        self.state.lock().unwrap().closes.clone()
    }

    pub fn open_paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        state
            .groups
            .iter()
            .flat_map(|tabs| tabs.iter().map(|(_, p)| p.clone()))
            .collect()
    }

    pub fn active_editor(&self) -> Option<PathBuf> {
        self.state.lock().unwrap().active_editor.clone()
    }
}

#[async_trait]
impl EditorSurface for RecordingSurface {
    fn tab_groups(&self) -> Result<Vec<TabGroup>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .enumerate()
            .map(|(group, tabs)| TabGroup {
                tabs: tabs
                    .iter()
                    .enumerate()
                    .map(|(index, (kind, path))| Tab {
                        handle: TabHandle { group, index },
                        kind: *kind,
                        path: Some(path.clone()),
                    })
                    .collect(),
                active_tab: state.active_tabs[group],
            })
            .collect())
    }

    fn active_group(&self) -> Result<Option<usize>> {
        Ok(self.state.lock().unwrap().active_group)
    }

    fn active_text_editor(&self) -> Result<Option<PathBuf>> {
        Ok(self.state.lock().unwrap().active_editor.clone())
    }

    async fn close_tabs(&self, tabs: &[TabHandle]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let doomed: HashSet<TabHandle> = tabs.iter().copied().collect();
        let mut closed = Vec::new();
        for (group, group_tabs) in state.groups.iter_mut().enumerate() {
            let mut index = 0;
            group_tabs.retain(|(_, path)| {
                let keep = !doomed.contains(&TabHandle { group, index });
                if !keep {
                    closed.push(path.clone());
                }
                index += 1;
                keep
            });
        }
        for active in state.active_tabs.iter_mut() {
            *active = None;
        }
        if let Some(editor) = state.active_editor.clone() {
            if closed.contains(&editor) {
                state.active_editor = None;
            }
        }
        state.closes.push(closed);
        Ok(())
    }

    async fn open_document(&self, path: &Path, options: OpenOptions) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.missing.contains(path) {
            return Err(BranchTabsError::open_failed(path, "file does not exist"));
        }
        state.opens.push(OpenCall {
            path: path.to_path_buf(),
            preserve_focus: options.preserve_focus,
        });
        if state.groups.is_empty() {
            state.groups.push(Vec::new());
            state.active_tabs.push(None);
            state.active_group = Some(0);
        }
        let group = state.active_group.unwrap_or(0);
        let index = match state.groups[group].iter().position(|(_, p)| p == path) {
            Some(index) => index,
            None => {
                state.groups[group].push((TabKind::Text, path.to_path_buf()));
                state.groups[group].len() - 1
            }
        };
        if !options.preserve_focus {
            state.active_tabs[group] = Some(index);
            state.active_editor = Some(path.to_path_buf());
        }
        Ok(())
    }
}

/// Pauses the first reflog query until released.
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// Repository whose live branch and reflog are scripted by the test.
pub struct ScriptedRepo {
    root: PathBuf,
    branch: Mutex<Option<String>>,
    ref_updates: Mutex<HashMap<String, DateTime<Utc>>>,
    branch_reads: AtomicUsize,
    gate: Mutex<Option<Gate>>,
}

impl ScriptedRepo {
    pub fn new(root: &str, branch: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            branch: Mutex::new(Some(branch.to_string())),
            ref_updates: Mutex::new(HashMap::new()),
            branch_reads: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    pub fn checkout(&self, branch: &str) {
        *self.branch.lock().unwrap() = Some(branch.to_string());
    }

    pub fn detach(&self) {
        *self.branch.lock().unwrap() = None;
    }

    /// Give `branch` a reflog entry from days ago.
    pub fn established(&self, branch: &str) {
        self.ref_updates
            .lock()
            .unwrap()
            .insert(branch.to_string(), Utc::now() - Duration::days(2));
    }

    /// Give `branch` a reflog entry from right now.
    pub fn just_created(&self, branch: &str) {
        self.ref_updates
            .lock()
            .unwrap()
            .insert(branch.to_string(), Utc::now());
    }

    pub fn branch_reads(&self) -> usize {
        self.branch_reads.load(Ordering::SeqCst)
    }

    /// Hold the next reflog query until `release` is notified.
    pub fn arm_gate(&self) -> Gate {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Gate {
            entered: entered.clone(),
            release: release.clone(),
        });
        Gate { entered, release }
    }
}

#[async_trait]
impl Repository for ScriptedRepo {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        self.branch_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.branch.lock().unwrap().clone())
    }

    async fn last_ref_update(&self, branch: &str) -> Result<DateTime<Utc>> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.ref_updates
            .lock()
            .unwrap()
            .get(branch)
            .copied()
            .ok_or_else(|| BranchTabsError::no_ref_history(branch))
    }
}

/// Persisted state that is always unavailable.
pub struct FailingBackend;

#[async_trait]
impl StateBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<Value>> {
        Err(BranchTabsError::store_unavailable("disk on fire"))
    }

    async fn update(&self, _key: &str, _value: Value) -> Result<()> {
        Err(BranchTabsError::store_unavailable("disk on fire"))
    }
}

/// In-memory state that yields to the executor before every read and write.
pub struct YieldingBackend(pub Arc<MemoryBackend>);

#[async_trait]
impl StateBackend for YieldingBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        tokio::task::yield_now().await;
        self.0.get(key).await
    }

    async fn update(&self, key: &str, value: Value) -> Result<()> {
        tokio::task::yield_now().await;
        self.0.update(key, value).await
    }
}

/// Coordinator wired to `surface` and `backend` with a fixed restore behavior.
pub fn coordinator_with(
    surface: Arc<RecordingSurface>,
    backend: impl StateBackend + 'static,
    behavior: RestoreBehavior,
) -> TransitionCoordinator {
    TransitionCoordinator::new(
        Arc::new(BranchStateStore::new(backend)),
        surface.clone(),
        TabReplayEngine::new(surface, Arc::new(behavior)),
        RecencyClassifier::default(),
    )
}

/// Coordinator over an in-memory backend shared with the test.
pub fn coordinator(
    surface: Arc<RecordingSurface>,
    backend: Arc<MemoryBackend>,
) -> TransitionCoordinator {
    coordinator_with(surface, backend, RestoreBehavior::PreserveTabOrder)
}

pub fn paths(files: &[&str]) -> Vec<PathBuf> {
    files.iter().map(PathBuf::from).collect()
}

pub fn open(path: &str, preserve_focus: bool) -> OpenCall {
    OpenCall {
        path: PathBuf::from(path),
        preserve_focus,
    }
}
