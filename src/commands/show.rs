use crate::core::{
    command_init::WorkspaceInit,
    error::Result,
    git::Repository,
    output::{format_saved_file, print_info, print_section_header},
};
use colored::*;
use std::path::{Path, PathBuf};

/// Print the saved tabs of every branch of the repository at `repo`.
pub async fn execute_show(repo: Option<PathBuf>, workspace: Option<&Path>) -> Result<()> {
    let context = WorkspaceInit::initialize(workspace)?;
    let repos = WorkspaceInit::open_repositories(repo.as_slice())?;
    let map = context.store.load().await?;

    for repo in repos {
        let key = repo.key();
        let current = repo.branch_name().await.ok();

        let branches: Vec<_> = map.branches(&key).collect();
        if branches.is_empty() {
            print_info(&format!("No saved tabs for {key}"));
            continue;
        }

        print_section_header(&format!("Saved tabs for {key}"));
        for (branch, state) in branches {
            let marker = if current.as_deref() == Some(branch) {
                "[*]".green().to_string()
            } else {
                "[ ]".bright_black().to_string()
            };
            println!("{marker} {branch} ({} file(s))", state.files.len());
            let focus = state.focus_file();
            for (i, path) in state.files.iter().enumerate() {
                println!(
                    "{}",
                    format_saved_file(i + 1, path, focus == Some(path.as_path()))
                );
            }
        }
        println!();
    }

    Ok(())
}
