use anyhow::Result;
use tracing::debug;

use crate::{
    routines::{error::TrackerError, flow::AddRoutineFlow, RoutineRow, RoutineTracker},
    storage::{activity_log::ActivityLog, routine_storage::RoutineStorage},
};

use super::prompt::{collect_new_routine, Prompter};

const ACTIONS: &str = "[a]dd routine, [c]omplete <number|name>, [r]efresh, [q]uit >";
const HELP: &str = "Commands:
  a            add a routine
  c <target>   complete the routine with that number or name
  r            refresh the list
  q            quit";

#[derive(Debug, PartialEq, Eq)]
enum SessionCommand {
    Add,
    Complete(String),
    Refresh,
    Quit,
    Help,
}

fn parse_command(line: &str) -> SessionCommand {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));
    match command.to_lowercase().as_str() {
        "a" | "add" => SessionCommand::Add,
        "c" | "complete" if !rest.is_empty() => SessionCommand::Complete(rest.to_string()),
        "r" | "refresh" => SessionCommand::Refresh,
        "q" | "quit" | "exit" => SessionCommand::Quit,
        _ => SessionCommand::Help,
    }
}

/// Finds a row either by its position as displayed (starting at 1) or by its name.
fn resolve_target<'a>(rows: &'a [RoutineRow], target: &str) -> Option<&'a RoutineRow> {
    if let Some(row) = rows.iter().find(|v| v.name == target) {
        return Some(row);
    }
    target
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| rows.get(index))
}

/// Interactive session. The rows shown last decide which completion controls are enabled, like
/// buttons on a screen would.
pub async fn run_session<S: RoutineStorage, L: ActivityLog>(
    tracker: &mut RoutineTracker<S, L>,
    prompter: &mut impl Prompter,
) -> Result<()> {
    let mut rows = tracker.refresh().await?;
    prompter.show_rows(&rows)?;

    while let Some(line) = prompter.ask_text("Streakify", ACTIONS)? {
        let command = parse_command(&line);
        debug!("Session command {command:?}");
        match command {
            SessionCommand::Add => {
                let today = tracker.now().date();
                if let AddRoutineFlow::Committed(routine) = collect_new_routine(prompter, today)? {
                    rows = tracker.add(routine).await?;
                    prompter.show_rows(&rows)?;
                }
            }
            SessionCommand::Complete(target) => match resolve_target(&rows, &target) {
                None => prompter.notify_error(
                    "Complete",
                    &TrackerError::UnknownRoutine(target).to_string(),
                )?,
                Some(row) if !row.completable => prompter.notify_error(
                    "Complete",
                    &TrackerError::NotCompletable(row.name.clone()).to_string(),
                )?,
                Some(row) => {
                    let name = row.name.clone();
                    rows = tracker.complete(&name).await?;
                    prompter.show_rows(&rows)?;
                }
            },
            SessionCommand::Refresh => {
                rows = tracker.refresh().await?;
                prompter.show_rows(&rows)?;
            }
            SessionCommand::Quit => break,
            SessionCommand::Help => prompter.notify(HELP)?,
        }
    }
    Ok(())
}
