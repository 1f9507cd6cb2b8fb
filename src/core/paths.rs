//! Path normalization and repository membership.
//!
//! Every path that crosses into the engine is normalized lexically (no filesystem
//! access) so that `/r/./a`, `/r//a` and `/r/x/../a` all compare equal. The
//! normalized repository root doubles as the top-level key of the persisted
//! branch map, see [`RepositoryKey`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path.
///
/// Resolves `.` and `..` segments, collapses repeated separators and drops
/// trailing separators. `..` above the root is discarded; leading `..` of a
/// relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}

/// True iff `file_path` is `repo_root` itself or lies inside it.
///
/// Comparison is component-wise after normalization, so `/repo-other/x` is
/// not under `/repo`.
pub fn is_under(file_path: &Path, repo_root: &Path) -> bool {
    normalize_path(file_path).starts_with(normalize_path(repo_root))
}

/// Canonical identifier of a repository root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryKey(String);

impl RepositoryKey {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self(normalize_path(root.as_ref()).to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Whether `file_path` belongs to this repository.
    pub fn contains(&self, file_path: &Path) -> bool {
        is_under(file_path, self.as_path())
    }
}

impl fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
