use crate::core::error::BranchTabsError;
use std::path::PathBuf;

pub fn get_config_directory() -> Result<PathBuf, BranchTabsError> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config")),
        "macos" => dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support"),
        _ => dirs::config_dir().unwrap_or_default(),
    };

    Ok(base.join("branch-tabs"))
}

pub fn get_cache_directory() -> Result<PathBuf, BranchTabsError> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".cache")),
        "macos" => dirs::home_dir().unwrap_or_default().join("Library/Caches"),
        _ => dirs::cache_dir().ok_or(BranchTabsError::CacheDirectoryNotFound)?,
    };

    Ok(base.join("branch-tabs"))
}
