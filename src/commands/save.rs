use crate::core::{
    command_init::WorkspaceInit,
    config::RestoreBehavior,
    error::Result,
    git::Repository,
    output::{format_saved_file, print_info, print_success},
    recency::RecencyClassifier,
};
use std::path::{Path, PathBuf};

/// Save the current tabs of the repository at `repo` under its current branch.
pub async fn execute_save(
    repo: Option<PathBuf>,
    session: &Path,
    workspace: Option<&Path>,
) -> Result<()> {
    let context = WorkspaceInit::initialize(workspace)?;
    let repos = WorkspaceInit::open_repositories(repo.as_slice())?;
    // Restore behavior is irrelevant when only saving.
    let coordinator = context.coordinator(
        session,
        Some(RestoreBehavior::default()),
        RecencyClassifier::default(),
    )?;

    for repo in repos {
        let (branch, state) = coordinator.snapshot(repo.as_ref()).await?;
        print_success(&format!(
            "Saved {} file(s) for branch '{branch}' of {}",
            state.files.len(),
            repo.root().display()
        ));
        if state.is_empty() {
            continue;
        }
        let focus = state.focus_file();
        let lines: Vec<String> = state
            .files
            .iter()
            .enumerate()
            .map(|(i, path)| format_saved_file(i + 1, path, focus == Some(path.as_path())))
            .collect();
        print_info(&lines.join("\n"));
    }

    Ok(())
}
