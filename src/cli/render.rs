use std::io::{self, Write};

use ansi_term::{Colour, Style};

use crate::{routines::RoutineRow, utils::time::format_time};

pub const TITLE: &str = "Streakify";
pub const COMPLETE_CONTROL: &str = "[Complete]";

/// Prints every routine as a row, with the completion control enabled or greyed out.
pub fn render_rows(rows: &[RoutineRow], out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", Colour::Purple.bold().paint(TITLE))?;
    if rows.is_empty() {
        writeln!(out, "No routines yet. Use 'a' to add one.")?;
    }
    for (index, row) in rows.iter().enumerate() {
        writeln!(out, "{}", format_row(index + 1, row))?;
    }
    writeln!(out)?;
    out.flush()
}

pub fn format_row(index: usize, row: &RoutineRow) -> String {
    let control = if row.completable {
        Colour::Green.bold().paint(COMPLETE_CONTROL)
    } else {
        Style::new().dimmed().paint(COMPLETE_CONTROL)
    };
    format!(
        "{index:>2}. {} - {} - Time: {}  🔥 Streak: {}  {control}",
        row.name,
        row.routine.category,
        format_time(row.routine.time),
        row.routine.streak,
    )
}
