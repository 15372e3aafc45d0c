pub mod commands;
pub mod prompt;
pub mod render;
pub mod session;

use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{process_add_command, process_complete_command, process_list_command, AddCommand};
use prompt::TerminalPrompter;
use session::run_session;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    routines::RoutineTracker,
    storage::{
        activity_log::FileActivityLog, routine_storage::JsonRoutineStorage, ACTIVITY_LOG_FILE,
        LOGS_DIR, ROUTINES_FILE,
    },
    utils::{
        clock::{Clock, LocalClock},
        dir::{create_application_default_path, ensure_dir},
        logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Streakify", version, long_about = None)]
#[command(about = "Keep track of your daily routines and their streaks", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long = "log-filter",
        global = true,
        help = "Level of diagnostics written to the logs directory"
    )]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Open the interactive routine list. This is the default")]
    Session,
    #[command(about = "Show routines and whether they can be completed right now")]
    List,
    #[command(about = "Add a routine without prompting")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Complete a routine for today")]
    Complete { name: String },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => {
            ensure_dir(&dir)?;
            dir
        }
        None => create_application_default_path()?,
    };

    let logging_level = args
        .log_filter
        .or_else(|| args.log.then_some(LevelFilter::TRACE));
    enable_logging(&app_dir.join(LOGS_DIR), logging_level, args.log)?;
    info!("Using application directory {app_dir:?}");

    let mut tracker = open_tracker(&app_dir, LocalClock).await?;

    match args.commands.unwrap_or(Commands::Session) {
        Commands::Session => {
            let mut prompter = TerminalPrompter::new(io::stdin().lock(), io::stdout());
            run_session(&mut tracker, &mut prompter).await
        }
        Commands::List => process_list_command(&mut tracker, &mut io::stdout()).await,
        Commands::Add { command } => {
            process_add_command(&mut tracker, command, &mut io::stdout()).await
        }
        Commands::Complete { name } => {
            process_complete_command(&mut tracker, &name, &mut io::stdout()).await
        }
    }
}

/// Loads routines kept in `app_dir`.
pub async fn open_tracker(
    app_dir: &Path,
    clock: impl Clock + Clone,
) -> Result<RoutineTracker<JsonRoutineStorage, FileActivityLog>> {
    let storage = JsonRoutineStorage::new(app_dir.join(ROUTINES_FILE));
    let activity_log =
        FileActivityLog::new(app_dir.join(ACTIVITY_LOG_FILE), Box::new(clock.clone()));
    RoutineTracker::load(storage, activity_log, Box::new(clock)).await
}
