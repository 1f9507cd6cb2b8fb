use branch_tabs::commands::*;
use branch_tabs::core::{
    error::{BranchTabsError, Result},
    print_error, RestoreBehavior, DEFAULT_POLL_INTERVAL, DEFAULT_RECENCY_SECS,
};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "branch-tabs")]
#[command(about = "Remembers the open editor tabs of every git branch")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Directory the saved state is scoped to (default: current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch repositories and restore tabs when switching branches
    Watch {
        /// Repository to watch, repeatable (default: current directory)
        #[arg(long = "repo")]
        repos: Vec<PathBuf>,
        /// Session file the editor mirrors its tabs into
        #[arg(long)]
        session: PathBuf,
        /// Poll interval in milliseconds
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
        interval_ms: u64,
        /// preserveTabOrder or focusActiveTabFirst (default: from config.json)
        #[arg(long)]
        restore_behavior: Option<RestoreBehavior>,
        /// Branches updated within this many seconds count as just created
        #[arg(long, default_value_t = DEFAULT_RECENCY_SECS)]
        recency_secs: i64,
    },
    /// Save the currently open tabs for the current branch
    Save {
        /// Repository to save (default: current directory)
        #[arg(long)]
        repo: Option<PathBuf>,
        /// Session file the editor mirrors its tabs into
        #[arg(long)]
        session: PathBuf,
    },
    /// Show the saved tabs of every branch
    Show {
        /// Repository to show (default: current directory)
        #[arg(long)]
        repo: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins unless --debug is given
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.debug {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let workspace = cli.workspace.as_deref();
    let result = match cli.command {
        Commands::Watch {
            repos,
            session,
            interval_ms,
            restore_behavior,
            recency_secs,
        } => {
            execute_watch(WatchOptions {
                repos,
                session,
                workspace: workspace.map(PathBuf::from),
                interval: Duration::from_millis(interval_ms),
                restore_behavior,
                recency_secs,
            })
            .await
        }
        Commands::Save { repo, session } => execute_save(repo, &session, workspace).await,
        Commands::Show { repo } => execute_show(repo, workspace).await,
    };

    if let Err(e) = result {
        if let BranchTabsError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }

    Ok(())
}
