//! Persisted branch state.
//!
//! [`BranchStateStore`] owns the [`BranchFileMap`] on top of a workspace-scoped
//! key-value [`StateBackend`]. The store has no partial-update API on disk: a
//! save always overwrites the whole map. Writes are serialized through an async
//! mutex so that two repositories settling at the same time cannot lose each
//! other's updates; [`BranchStateStore::update`] holds that lock across the
//! whole load → mutate → save cycle.
//!
//! Entries are never removed implicitly.

use crate::core::{
    dirs::get_cache_directory,
    error::{BranchTabsError, Result},
    paths::RepositoryKey,
    state::{BranchFileMap, BranchTabState},
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::Mutex;

/// Key under which the branch map lives in the backend.
pub const BRANCH_STATE_KEY: &str = "branchTabs.branchFileMap";

/// Workspace-scoped persisted key-value state.
#[async_trait]
pub trait StateBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn update(&self, key: &str, value: Value) -> Result<()>;
}

/// One JSON object file per workspace, rewritten atomically.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend for `workspace` under the user's cache directory.
    pub fn for_workspace(workspace: &Path) -> Result<Self> {
        let cache_dir = get_cache_directory()?;
        let workspace_hash = format!("{:x}", md5::compute(workspace.to_string_lossy().as_bytes()));
        log::debug!(
            "State directory for workspace {}: {}",
            workspace.display(),
            cache_dir.join(&workspace_hash).display()
        );
        Ok(Self::new(cache_dir.join(workspace_hash).join("state.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(BranchTabsError::store_read_failed(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| BranchTabsError::store_parse_failed(&self.path, e))
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BranchTabsError::store_write_failed(parent, e))?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| BranchTabsError::store_write_failed(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| BranchTabsError::store_write_failed(&self.path, e))
    }
}

#[async_trait]
impl StateBackend for JsonFileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Value>> {
            Ok(backend.read_all()?.remove(&key))
        })
        .await?
    }

    async fn update(&self, key: &str, value: Value) -> Result<()> {
        let backend = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut entries = backend.read_all()?;
            entries.insert(key, value);
            backend.write_all(&entries)
        })
        .await?
    }
}

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: StdMutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with `value` under `key`.
    pub fn with_entry(key: &str, value: Value) -> Self {
        let backend = Self::new();
        backend.set(key, value);
        backend
    }

    pub fn set(&self, key: &str, value: Value) {
        self.entries().insert(key.to_string(), value);
    }

    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.entries().get(key).cloned()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StateBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.snapshot(key))
    }

    async fn update(&self, key: &str, value: Value) -> Result<()> {
        self.set(key, value);
        Ok(())
    }
}

#[async_trait]
impl<T: StateBackend + ?Sized> StateBackend for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key).await
    }

    async fn update(&self, key: &str, value: Value) -> Result<()> {
        (**self).update(key, value).await
    }
}

/// Sole mutator of the persisted [`BranchFileMap`].
pub struct BranchStateStore {
    backend: Box<dyn StateBackend>,
    write_lock: Mutex<()>,
}

impl BranchStateStore {
    pub fn new(backend: impl StateBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the persisted map; absent storage yields an empty map.
    pub async fn load(&self) -> Result<BranchFileMap> {
        match self.backend.get(BRANCH_STATE_KEY).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|source| BranchTabsError::StoreDecodeFailed { source }),
            None => Ok(BranchFileMap::new()),
        }
    }

    /// Persist the full map, overwriting what was stored.
    pub async fn save(&self, map: &BranchFileMap) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(map).await
    }

    /// Load, apply `mutate` and save, all under the write lock.
    pub async fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BranchFileMap) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        mutate(&mut map);
        self.write(&map).await
    }

    pub fn get<'a>(
        map: &'a BranchFileMap,
        repo: &RepositoryKey,
        branch: &str,
    ) -> Option<&'a BranchTabState> {
        map.get(repo, branch)
    }

    pub fn put(map: &mut BranchFileMap, repo: &RepositoryKey, branch: &str, state: BranchTabState) {
        map.insert(repo.clone(), branch, state);
    }

    async fn write(&self, map: &BranchFileMap) -> Result<()> {
        let value = serde_json::to_value(map)?;
        self.backend.update(BRANCH_STATE_KEY, value).await.map_err(|e| {
            log::error!("Failed to persist branch state: {e}");
            e
        })
    }
}
