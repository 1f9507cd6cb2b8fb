use crate::core::{
    command_init::WorkspaceInit,
    config::RestoreBehavior,
    error::Result,
    git::Repository,
    output::{print_info, print_success},
    recency::RecencyClassifier,
    watcher::HeadWatcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

pub struct WatchOptions {
    pub repos: Vec<PathBuf>,
    pub session: PathBuf,
    pub workspace: Option<PathBuf>,
    pub interval: Duration,
    pub restore_behavior: Option<RestoreBehavior>,
    pub recency_secs: i64,
}

/// Track the given repositories and restore tabs on every branch switch until Ctrl-C.
pub async fn execute_watch(options: WatchOptions) -> Result<()> {
    let context = WorkspaceInit::initialize(options.workspace.as_deref())?;
    let repos = WorkspaceInit::open_repositories(&options.repos)?;
    let coordinator = Arc::new(context.coordinator(
        &options.session,
        options.restore_behavior,
        RecencyClassifier::new(chrono::Duration::seconds(options.recency_secs)),
    )?);

    let mut watchers = JoinSet::new();
    for repo in repos {
        let branch = coordinator.track(repo.as_ref()).await?;
        print_info(&format!(
            "Watching {} on branch '{branch}'",
            repo.root().display()
        ));
        let watcher = HeadWatcher::new(coordinator.clone(), repo, options.interval);
        watchers.spawn(watcher.run());
    }

    tokio::signal::ctrl_c().await?;
    watchers.abort_all();
    print_success("Stopped watching");
    Ok(())
}
