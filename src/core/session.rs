//! Editor surface backed by a workspace session file.
//!
//! The host editor mirrors its tab layout into a JSON file and applies changes
//! written back to it:
//!
//! ```json
//! {
//!   "groups": [ { "tabs": [ { "path": "/r/a.ts", "kind": "text" } ], "activeTab": 0 } ],
//!   "activeGroup": 0,
//!   "activeEditor": "/r/a.ts"
//! }
//! ```
//!
//! Every call re-reads the file, so the surface always reflects the editor's
//! latest state. Writes replace the file atomically. Queries read the file in
//! place; close and open run on the blocking pool.

use crate::core::{
    error::{BranchTabsError, Result},
    paths::normalize_path,
    surface::{EditorSurface, OpenOptions, Tab, TabGroup, TabHandle, TabKind},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    #[serde(default)]
    pub groups: Vec<SessionGroup>,
    #[serde(default)]
    pub active_group: Option<usize>,
    #[serde(default)]
    pub active_editor: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGroup {
    #[serde(default)]
    pub tabs: Vec<SessionTab>,
    #[serde(default)]
    pub active_tab: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTab {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub kind: TabKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preview: bool,
}

impl SessionTab {
    pub fn text(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            kind: TabKind::Text,
            preview: false,
        }
    }

    fn is_document(&self, path: &Path) -> bool {
        self.kind == TabKind::Text
            && self
                .path
                .as_deref()
                .is_some_and(|own| normalize_path(own) == normalize_path(path))
    }
}

impl SessionFile {
    fn still_open(&self, path: &Path) -> bool {
        self.groups
            .iter()
            .any(|group| group.tabs.iter().any(|tab| tab.is_document(path)))
    }
}

#[derive(Clone)]
pub struct SessionFileSurface {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl SessionFileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current session; a missing file is an empty editor.
    pub fn read(&self) -> Result<SessionFile> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionFile::default())
            }
            Err(e) => return Err(BranchTabsError::Io(e)),
        };
        serde_json::from_str(&content)
            .map_err(|e| BranchTabsError::session_parse_failed(&self.path, e))
    }

    pub fn write(&self, session: &SessionFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(session)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read, change and write back the session on the blocking pool.
    async fn modify<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut SessionFile) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let surface = self.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let _guard = surface
                .write_lock
                .lock()
                .map_err(|_| BranchTabsError::surface("session lock poisoned"))?;
            let mut session = surface.read()?;
            let value = change(&mut session)?;
            surface.write(&session)?;
            Ok(value)
        })
        .await?
    }
}

#[async_trait]
impl EditorSurface for SessionFileSurface {
    fn tab_groups(&self) -> Result<Vec<TabGroup>> {
        let session = self.read()?;
        let groups = session
            .groups
            .iter()
            .enumerate()
            .map(|(group_index, group)| TabGroup {
                tabs: group
                    .tabs
                    .iter()
                    .enumerate()
                    .map(|(index, tab)| Tab {
                        handle: TabHandle {
                            group: group_index,
                            index,
                        },
                        kind: tab.kind,
                        path: tab.path.clone(),
                    })
                    .collect(),
                active_tab: group.active_tab,
            })
            .collect();
        Ok(groups)
    }

    fn active_group(&self) -> Result<Option<usize>> {
        Ok(self.read()?.active_group)
    }

    fn active_text_editor(&self) -> Result<Option<PathBuf>> {
        Ok(self.read()?.active_editor)
    }

    async fn close_tabs(&self, tabs: &[TabHandle]) -> Result<()> {
        let doomed: HashSet<TabHandle> = tabs.iter().copied().collect();
        self.modify(move |session| {
            for (group_index, group) in session.groups.iter_mut().enumerate() {
                let active = group.active_tab;
                let mut kept = Vec::with_capacity(group.tabs.len());
                let mut new_active = None;
                for (index, tab) in group.tabs.drain(..).enumerate() {
                    if doomed.contains(&TabHandle {
                        group: group_index,
                        index,
                    }) {
                        continue;
                    }
                    if Some(index) == active {
                        new_active = Some(kept.len());
                    }
                    kept.push(tab);
                }
                group.active_tab = new_active.or_else(|| kept.len().checked_sub(1));
                group.tabs = kept;
            }
            if let Some(editor) = session.active_editor.take() {
                if session.still_open(&editor) {
                    session.active_editor = Some(editor);
                }
            }
            Ok(())
        })
        .await
    }

    async fn open_document(&self, path: &Path, options: OpenOptions) -> Result<()> {
        let path = path.to_path_buf();
        self.modify(move |session| {
            if !path.is_file() {
                return Err(BranchTabsError::open_failed(&path, "file does not exist"));
            }
            if session.groups.is_empty() {
                session.groups.push(SessionGroup::default());
            }
            let group_index = session
                .active_group
                .filter(|index| *index < session.groups.len())
                .unwrap_or(0);
            let group = &mut session.groups[group_index];

            let tab_index = match group.tabs.iter().position(|tab| tab.is_document(&path)) {
                Some(index) => {
                    group.tabs[index].preview &= options.preview;
                    index
                }
                None => {
                    group.tabs.push(SessionTab {
                        preview: options.preview,
                        ..SessionTab::text(path.clone())
                    });
                    group.tabs.len() - 1
                }
            };

            if !options.preserve_focus {
                group.active_tab = Some(tab_index);
                session.active_group = Some(group_index);
                session.active_editor = Some(path);
            } else if group.active_tab.is_none() {
                group.active_tab = Some(tab_index);
            }
            Ok(())
        })
        .await
    }
}
