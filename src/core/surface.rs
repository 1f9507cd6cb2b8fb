//! The open-editor surface and read-only queries over it.
//!
//! The host editor is reached through [`EditorSurface`]: ordered tab groups of
//! tabs, an active tab per group, an active group, an active text editor, a
//! batch close by handle and an open-with-options call. The free functions in
//! this module ([`open_files`], [`active_file`], [`tabs_under`]) are the
//! repository-scoped reads the engine performs against it.

use crate::core::{
    error::Result,
    paths::{is_under, normalize_path},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Opaque handle of one tab, valid until the surface changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabHandle {
    pub group: usize,
    pub index: usize,
}

/// What backs a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    #[default]
    Text,
    /// Anything that is not a text document: diffs, images, terminals, webviews.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub handle: TabHandle,
    pub kind: TabKind,
    pub path: Option<PathBuf>,
}

impl Tab {
    /// Path of the text document behind this tab, if it is one.
    pub fn text_path(&self) -> Option<&Path> {
        match self.kind {
            TabKind::Text => self.path.as_deref(),
            TabKind::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabGroup {
    pub tabs: Vec<Tab>,
    pub active_tab: Option<usize>,
}

impl TabGroup {
    pub fn active(&self) -> Option<&Tab> {
        self.active_tab.and_then(|index| self.tabs.get(index))
    }
}

/// Options for [`EditorSurface::open_document`]. Documents are always opened
/// durable, never in preview mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub preserve_focus: bool,
    pub preview: bool,
}

impl OpenOptions {
    pub fn focused() -> Self {
        Self {
            preserve_focus: false,
            preview: false,
        }
    }

    pub fn background() -> Self {
        Self {
            preserve_focus: true,
            preview: false,
        }
    }
}

#[async_trait]
pub trait EditorSurface: Send + Sync {
    /// Tab groups in display order.
    fn tab_groups(&self) -> Result<Vec<TabGroup>>;

    /// Index of the active tab group.
    fn active_group(&self) -> Result<Option<usize>>;

    /// Document of the focused text editor, if focus is on one.
    fn active_text_editor(&self) -> Result<Option<PathBuf>>;

    /// Close all `tabs` in one operation.
    async fn close_tabs(&self, tabs: &[TabHandle]) -> Result<()>;

    async fn open_document(&self, path: &Path, options: OpenOptions) -> Result<()>;
}

/// Open text files under `repo_root`, in display order, first occurrence wins.
///
/// Paths are normalized, so different spellings of one file count once.
pub fn open_files(surface: &dyn EditorSurface, repo_root: &Path) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for group in surface.tab_groups()? {
        for tab in &group.tabs {
            let Some(path) = tab.text_path() else {
                continue;
            };
            if !is_under(path, repo_root) {
                continue;
            }
            let path = normalize_path(path);
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

/// The focused file of `repo_root`.
///
/// Prefers the focused text editor; when focus sits on a non-editor panel the
/// active tab of the active group is used instead.
pub fn active_file(surface: &dyn EditorSurface, repo_root: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = surface.active_text_editor()? {
        if is_under(&path, repo_root) {
            return Ok(Some(normalize_path(&path)));
        }
    }

    let Some(group_index) = surface.active_group()? else {
        return Ok(None);
    };
    let groups = surface.tab_groups()?;
    let fallback = groups
        .get(group_index)
        .and_then(TabGroup::active)
        .and_then(Tab::text_path)
        .filter(|path| is_under(path, repo_root))
        .map(normalize_path);
    Ok(fallback)
}

/// Handles of every text tab under `repo_root`, duplicates included.
pub fn tabs_under(surface: &dyn EditorSurface, repo_root: &Path) -> Result<Vec<TabHandle>> {
    let handles = surface
        .tab_groups()?
        .iter()
        .flat_map(|group| group.tabs.iter())
        .filter(|tab| tab.text_path().is_some_and(|path| is_under(path, repo_root)))
        .map(|tab| tab.handle)
        .collect();
    Ok(handles)
}
