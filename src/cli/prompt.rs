use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;

use crate::routines::{
    flow::{parse_yes_no, AddRoutineFlow, FlowInput, Question},
    RoutineRow,
};

use super::render::render_rows;

/// Everything the interactive session needs from the user facing surface. Every call blocks until
/// the user has answered.
pub trait Prompter {
    /// `None` means the prompt was cancelled.
    fn ask_text(&mut self, title: &str, prompt: &str) -> Result<Option<String>>;

    /// A cancelled question is a "no".
    fn ask_yes_no(&mut self, title: &str, prompt: &str) -> Result<bool>;

    fn notify(&mut self, message: &str) -> Result<()>;

    fn notify_error(&mut self, title: &str, message: &str) -> Result<()>;

    fn show_rows(&mut self, rows: &[RoutineRow]) -> Result<()>;
}

/// Line based [Prompter]. End of input cancels whatever is being asked.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, title: &str, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{title}: {prompt} ")?;
        self.output.flush()?;
        self.read_line()
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask_text(&mut self, title: &str, prompt: &str) -> Result<Option<String>> {
        self.ask(title, prompt)
    }

    fn ask_yes_no(&mut self, title: &str, prompt: &str) -> Result<bool> {
        loop {
            let Some(answer) = self.ask(title, &format!("{prompt} [y/n]"))? else {
                return Ok(false);
            };
            match parse_yes_no(&answer) {
                Some(v) => return Ok(v),
                None => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn notify_error(&mut self, title: &str, message: &str) -> Result<()> {
        writeln!(self.output, "Error: {title}: {message}")?;
        Ok(())
    }

    fn show_rows(&mut self, rows: &[RoutineRow]) -> Result<()> {
        render_rows(rows, &mut self.output)?;
        Ok(())
    }
}

/// Walks the user through the add flow one prompt at a time. Validation errors are reported
/// through the prompter before the aborted flow is returned.
pub fn collect_new_routine(
    prompter: &mut impl Prompter,
    today: NaiveDate,
) -> Result<AddRoutineFlow> {
    let mut flow = AddRoutineFlow::default();
    while let Some(question) = flow.question() {
        let answer = match question {
            Question::Text { title, prompt } => FlowInput::Text(prompter.ask_text(title, &prompt)?),
            Question::YesNo { title, prompt } => {
                FlowInput::Confirm(prompter.ask_yes_no(title, &prompt)?)
            }
        };
        flow = flow.feed(answer, today);
    }

    if let AddRoutineFlow::Aborted(Some(e)) = &flow {
        prompter.notify_error(e.title(), &e.to_string())?;
    }
    Ok(flow)
}
