use std::io::Write;

use anyhow::{bail, Result};

use crate::{
    routines::{
        error::{RoutineInputError, TrackerError},
        flow::{AddRoutineFlow, FlowInput},
        RoutineTracker,
    },
    storage::{activity_log::ActivityLog, routine_storage::RoutineStorage},
};

use super::render::render_rows;

#[derive(Debug, clap::Args)]
pub struct AddCommand {
    #[arg(
        long,
        short,
        help = "Name of the routine. An existing routine with this name is replaced"
    )]
    name: String,
    #[arg(long, short, help = "Scheduled time in HH:MM format")]
    time: String,
    #[arg(
        long,
        short,
        help = "Category, for example Health, Productivity, Exercise, Learning. Defaults to Other"
    )]
    category: Option<String>,
    #[arg(long, help = "Remove the routine automatically after --end-date")]
    temporary: bool,
    #[arg(
        long = "end-date",
        short,
        requires = "temporary",
        help = "Last day of a temporary routine in YYYY-MM-DD format. Has to be in the future"
    )]
    end_date: Option<String>,
}

impl AddCommand {
    /// Answers for [AddRoutineFlow] in the order it asks for them.
    fn into_answers(self) -> Vec<FlowInput> {
        vec![
            FlowInput::Text(Some(self.name)),
            FlowInput::Text(Some(self.time)),
            FlowInput::Text(self.category),
            FlowInput::Confirm(self.temporary),
            FlowInput::Text(self.end_date),
        ]
    }
}

pub async fn process_list_command<S: RoutineStorage, L: ActivityLog>(
    tracker: &mut RoutineTracker<S, L>,
    out: &mut impl Write,
) -> Result<()> {
    let rows = tracker.refresh().await?;
    render_rows(&rows, out)?;
    Ok(())
}

/// Adds a routine without prompting. Input is validated exactly like in the interactive flow.
pub async fn process_add_command<S: RoutineStorage, L: ActivityLog>(
    tracker: &mut RoutineTracker<S, L>,
    command: AddCommand,
    out: &mut impl Write,
) -> Result<()> {
    if command.end_date.is_some() && !command.temporary {
        return Err(RoutineInputError::EndDateWithoutTemporary.into());
    }
    let today = tracker.now().date();
    match AddRoutineFlow::run(command.into_answers(), today) {
        AddRoutineFlow::Committed(routine) => {
            let rows = tracker.add(routine).await?;
            render_rows(&rows, out)?;
            Ok(())
        }
        AddRoutineFlow::Aborted(Some(e)) => Err(e.into()),
        AddRoutineFlow::Aborted(None) => bail!("A routine name is required"),
        other => bail!("Adding a routine stopped unexpectedly at {other:?}"),
    }
}

/// Completes a routine, but only if it would be offered for completion right now.
pub async fn process_complete_command<S: RoutineStorage, L: ActivityLog>(
    tracker: &mut RoutineTracker<S, L>,
    name: &str,
    out: &mut impl Write,
) -> Result<()> {
    let rows = tracker.refresh().await?;
    let Some(row) = rows.iter().find(|v| v.name == name) else {
        return Err(TrackerError::UnknownRoutine(name.to_string()).into());
    };
    if !row.completable {
        return Err(TrackerError::NotCompletable(name.to_string()).into());
    }

    let rows = tracker.complete(name).await?;
    render_rows(&rows, out)?;
    Ok(())
}
