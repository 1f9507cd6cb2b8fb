//! Git repository management and setup utilities
//!
//! Provides functions for creating real test repositories whose branches have
//! controlled reflog timestamps.

#![allow(dead_code)]

use branch_tabs::core::error::{BranchTabsError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Reflog date for branches that must look long established.
pub const OLD_DATE: &str = "2020-01-01T00:00:00Z";

/// Test repository setup result containing both the temporary directory
/// and the repository path. The TempDir must be kept alive for the duration
/// of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of `name` inside the repository, as a string.
    pub fn file(&self, name: &str) -> String {
        self.path.join(name).to_string_lossy().into_owned()
    }
}

fn run_git(repo_path: &Path, args: &[&str], date: Option<&str>) -> Result<()> {
    let mut cmd = std::process::Command::new("git");
    cmd.args(args).current_dir(repo_path);
    if let Some(date) = date {
        cmd.env("GIT_COMMITTER_DATE", date).env("GIT_AUTHOR_DATE", date);
    }
    let output = cmd.output().map_err(BranchTabsError::Io)?;
    if !output.status.success() {
        return Err(BranchTabsError::Io(std::io::Error::other(format!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        ))));
    }
    Ok(())
}

/// Runs git with the current time.
pub fn git(repo_path: &Path, args: &[&str]) -> Result<()> {
    run_git(repo_path, args, None)
}

/// Runs git with the committer clock set to [`OLD_DATE`].
pub fn git_at_old_date(repo_path: &Path, args: &[&str]) -> Result<()> {
    run_git(repo_path, args, Some(OLD_DATE))
}

/// Sets up a git repository on `main` with one old commit.
///
/// The repository path is canonicalized so it matches what git reports.
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().canonicalize()?;

    git(&path, &["init", "-b", "main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    create_file(&path, "initial.txt", "initial content\n")?;
    git_at_old_date(&path, &["add", "initial.txt"])?;
    git_at_old_date(&path, &["commit", "-m", "Initial commit"])?;

    Ok(TestRepo { temp_dir, path })
}

/// Creates `name` as a long established branch without switching to it.
pub fn create_old_branch(repo_path: &Path, name: &str) -> Result<()> {
    git_at_old_date(repo_path, &["branch", name])
}

pub fn checkout(repo_path: &Path, name: &str) -> Result<()> {
    git(repo_path, &["checkout", "-q", name])
}

/// Creates and switches to a new branch, as `git checkout -b` does.
pub fn checkout_new_branch(repo_path: &Path, name: &str) -> Result<()> {
    git(repo_path, &["checkout", "-q", "-b", name])
}

pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    fs::write(repo_path.join(filename), content)?;
    Ok(())
}

/// Creates multiple files with sequential content.
pub fn create_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        create_file(repo_path, filename, &format!("content{}\n", i + 1))?;
    }
    Ok(())
}
