use crate::core::dirs::get_config_directory;
use crate::core::error::{BranchTabsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How saved tabs are reopened.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum RestoreBehavior {
    /// Reopen in saved order, then focus the saved active file.
    #[default]
    PreserveTabOrder,
    /// Open the saved active file first, then the rest in the background.
    FocusActiveTabFirst,
}

impl FromStr for RestoreBehavior {
    type Err = BranchTabsError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "preserveTabOrder" => Ok(Self::PreserveTabOrder),
            "focusActiveTabFirst" => Ok(Self::FocusActiveTabFirst),
            other => Err(BranchTabsError::invalid_restore_behavior(other)),
        }
    }
}

impl fmt::Display for RestoreBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreserveTabOrder => f.write_str("preserveTabOrder"),
            Self::FocusActiveTabFirst => f.write_str("focusActiveTabFirst"),
        }
    }
}

/// Source of the restore behavior, consulted once per replay.
pub trait SettingsProvider: Send + Sync {
    fn restore_behavior(&self) -> RestoreBehavior;
}

impl SettingsProvider for RestoreBehavior {
    fn restore_behavior(&self) -> RestoreBehavior {
        *self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub restore_behavior: RestoreBehavior,
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Settings file that is re-read on every query.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `config.json` in the user's configuration directory.
    pub fn user() -> Result<Self> {
        Ok(Self::new(get_config_directory()?.join("config.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for FileSettings {
    fn restore_behavior(&self) -> RestoreBehavior {
        match Settings::load_from(&self.path) {
            Ok(settings) => settings.restore_behavior,
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable settings '{}': {e}",
                    self.path.display()
                );
                RestoreBehavior::default()
            }
        }
    }
}
