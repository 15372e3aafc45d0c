//! The add routine flow. Answers are collected one at a time and every invalid answer ends the
//! flow without touching the store, so the flow itself never performs side effects. Driving it
//! against a real user is the job of the presentation layer.

use chrono::{NaiveDate, NaiveTime};

use crate::utils::time::{format_time, DATE_FORMAT, TIME_FORMAT};

use super::{
    entities::{Lifetime, NewRoutine, CATEGORY_SUGGESTIONS, DEFAULT_CATEGORY},
    error::RoutineInputError,
};

/// A single answer given by the user. `Text(None)` means the prompt was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowInput {
    Text(Option<String>),
    Confirm(bool),
}

impl FlowInput {
    pub fn text(value: impl Into<String>) -> Self {
        FlowInput::Text(Some(value.into()))
    }
}

/// What the flow wants to know next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    Text { title: &'static str, prompt: String },
    YesNo { title: &'static str, prompt: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AddRoutineFlow {
    #[default]
    CollectingName,
    CollectingTime {
        name: String,
    },
    CollectingCategory {
        name: String,
        time: NaiveTime,
    },
    CollectingTemporary {
        name: String,
        time: NaiveTime,
        category: String,
    },
    CollectingEndDate {
        name: String,
        time: NaiveTime,
        category: String,
    },
    Committed(NewRoutine),
    /// `None` is a silent abort, e.g. when no name was given.
    Aborted(Option<RoutineInputError>),
}

impl AddRoutineFlow {
    /// Runs the flow over a prepared list of answers. Running out of answers before the flow has
    /// finished aborts it silently.
    pub fn run(answers: impl IntoIterator<Item = FlowInput>, today: NaiveDate) -> Self {
        let mut flow = AddRoutineFlow::default();
        let mut answers = answers.into_iter();
        while !flow.is_finished() {
            flow = match answers.next() {
                Some(answer) => flow.feed(answer, today),
                None => AddRoutineFlow::Aborted(None),
            };
        }
        flow
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            AddRoutineFlow::Committed(_) | AddRoutineFlow::Aborted(_)
        )
    }

    pub fn question(&self) -> Option<Question> {
        let question = match self {
            AddRoutineFlow::CollectingName => Question::Text {
                title: "Routine",
                prompt: "Enter the routine:".into(),
            },
            AddRoutineFlow::CollectingTime { .. } => Question::Text {
                title: "Time",
                prompt: "Enter the time (HH:MM):".into(),
            },
            AddRoutineFlow::CollectingCategory { .. } => Question::Text {
                title: "Category",
                prompt: format!(
                    "Enter a category (e.g., {}):",
                    CATEGORY_SUGGESTIONS.join(", ")
                ),
            },
            AddRoutineFlow::CollectingTemporary { .. } => Question::YesNo {
                title: "Routine Type",
                prompt: "Is this a temporary routine?".into(),
            },
            AddRoutineFlow::CollectingEndDate { .. } => Question::Text {
                title: "End Date",
                prompt: "Enter the end date (YYYY-MM-DD):".into(),
            },
            AddRoutineFlow::Committed(_) | AddRoutineFlow::Aborted(_) => return None,
        };
        Some(question)
    }

    /// Consumes one answer. A text answer to the yes/no question is interpreted as yes/no, and
    /// leaves the flow where it is if it can't be.
    pub fn feed(self, input: FlowInput, today: NaiveDate) -> Self {
        match self {
            AddRoutineFlow::CollectingName => match non_empty(input) {
                Some(name) => AddRoutineFlow::CollectingTime { name },
                None => AddRoutineFlow::Aborted(None),
            },
            AddRoutineFlow::CollectingTime { name } => {
                match non_empty(input).as_deref().map(parse_time) {
                    Some(Ok(time)) => AddRoutineFlow::CollectingCategory { name, time },
                    Some(Err(e)) => AddRoutineFlow::Aborted(Some(e)),
                    None => AddRoutineFlow::Aborted(Some(RoutineInputError::InvalidTime)),
                }
            }
            AddRoutineFlow::CollectingCategory { name, time } => {
                let category = non_empty(input).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
                AddRoutineFlow::CollectingTemporary {
                    name,
                    time,
                    category,
                }
            }
            AddRoutineFlow::CollectingTemporary {
                name,
                time,
                category,
            } => {
                let temporary = match input {
                    FlowInput::Confirm(v) => Some(v),
                    FlowInput::Text(text) => text.as_deref().and_then(parse_yes_no),
                };
                match temporary {
                    Some(true) => AddRoutineFlow::CollectingEndDate {
                        name,
                        time,
                        category,
                    },
                    Some(false) => AddRoutineFlow::Committed(NewRoutine {
                        name,
                        time,
                        category,
                        lifetime: Lifetime::Permanent,
                    }),
                    None => AddRoutineFlow::CollectingTemporary {
                        name,
                        time,
                        category,
                    },
                }
            }
            AddRoutineFlow::CollectingEndDate {
                name,
                time,
                category,
            } => {
                let end_date = non_empty(input)
                    .ok_or(RoutineInputError::InvalidDate)
                    .and_then(|v| parse_end_date(&v, today));
                match end_date {
                    Ok(end) => AddRoutineFlow::Committed(NewRoutine {
                        name,
                        time,
                        category,
                        lifetime: Lifetime::Until(end),
                    }),
                    Err(e) => AddRoutineFlow::Aborted(Some(e)),
                }
            }
            finished @ (AddRoutineFlow::Committed(_) | AddRoutineFlow::Aborted(_)) => finished,
        }
    }
}

fn non_empty(input: FlowInput) -> Option<String> {
    match input {
        FlowInput::Text(Some(v)) => {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        }
        FlowInput::Text(None) | FlowInput::Confirm(_) => None,
    }
}

/// Parses a scheduled time. Only the two digit `HH:MM` form is accepted, so whatever was typed is
/// exactly what gets stored.
pub fn parse_time(input: &str) -> Result<NaiveTime, RoutineInputError> {
    let input = input.trim();
    let time = NaiveTime::parse_from_str(input, TIME_FORMAT)
        .map_err(|_| RoutineInputError::InvalidTime)?;
    if format_time(time) != input {
        return Err(RoutineInputError::InvalidTime);
    }
    Ok(time)
}

/// Parses an end date, which has to be strictly after `today`.
pub fn parse_end_date(input: &str, today: NaiveDate) -> Result<NaiveDate, RoutineInputError> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| RoutineInputError::InvalidDate)?;
    if date <= today {
        return Err(RoutineInputError::EndDateNotInFuture);
    }
    Ok(date)
}

pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use crate::{
        routines::{
            entities::{Lifetime, NewRoutine},
            error::RoutineInputError,
        },
        utils::time::format_time,
    };

    use super::{parse_end_date, parse_time, parse_yes_no, AddRoutineFlow, FlowInput, Question};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_permanent_routine_committed() {
        let flow = AddRoutineFlow::run(
            [
                FlowInput::text("Meditate"),
                FlowInput::text("07:00"),
                FlowInput::text("Health"),
                FlowInput::Confirm(false),
            ],
            today(),
        );

        assert_eq!(
            flow,
            AddRoutineFlow::Committed(NewRoutine {
                name: "Meditate".into(),
                time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                category: "Health".into(),
                lifetime: Lifetime::Permanent,
            })
        );
    }

    #[test]
    fn test_temporary_routine_committed() {
        let flow = AddRoutineFlow::run(
            [
                FlowInput::text("Diet Plan"),
                FlowInput::text("08:00"),
                FlowInput::text("Health"),
                FlowInput::Confirm(true),
                FlowInput::text("2024-05-11"),
            ],
            today(),
        );

        let AddRoutineFlow::Committed(routine) = flow else {
            panic!("Expected committed flow, got {flow:?}");
        };
        assert_eq!(
            routine.lifetime,
            Lifetime::Until(NaiveDate::from_ymd_opt(2024, 5, 11).unwrap())
        );
    }

    #[test]
    fn test_empty_name_aborts_silently() {
        for name in [FlowInput::Text(None), FlowInput::text(""), FlowInput::text("   ")] {
            let flow = AddRoutineFlow::default().feed(name, today());
            assert_eq!(flow, AddRoutineFlow::Aborted(None));
        }
    }

    #[test]
    fn test_invalid_time_aborts() {
        for time in [
            FlowInput::text("7am"),
            FlowInput::text("25:00"),
            FlowInput::Text(None),
        ] {
            let flow = AddRoutineFlow::run([FlowInput::text("Run"), time], today());
            assert_eq!(flow, AddRoutineFlow::Aborted(Some(RoutineInputError::InvalidTime)));
        }
    }

    #[test]
    fn test_empty_category_defaults_to_other() {
        let flow = AddRoutineFlow::run(
            [
                FlowInput::text("Read"),
                FlowInput::text("21:15"),
                FlowInput::Text(None),
                FlowInput::Confirm(false),
            ],
            today(),
        );
        let AddRoutineFlow::Committed(routine) = flow else {
            panic!("Expected committed flow, got {flow:?}");
        };
        assert_eq!(routine.category, "Other");
    }

    #[test]
    fn test_end_date_validation() {
        let prefix = || {
            vec![
                FlowInput::text("Diet Plan"),
                FlowInput::text("08:00"),
                FlowInput::text("Health"),
                FlowInput::Confirm(true),
            ]
        };
        let cases = [
            (FlowInput::Text(None), RoutineInputError::InvalidDate),
            (FlowInput::text("next week"), RoutineInputError::InvalidDate),
            (FlowInput::text("2024-05-10"), RoutineInputError::EndDateNotInFuture),
            (FlowInput::text("2024-05-01"), RoutineInputError::EndDateNotInFuture),
        ];

        for (end_date, expected) in cases {
            let mut answers = prefix();
            answers.push(end_date);
            let flow = AddRoutineFlow::run(answers, today());
            assert_eq!(flow, AddRoutineFlow::Aborted(Some(expected)));
        }
    }

    #[test]
    fn test_text_answer_to_yes_no_question() {
        let flow = AddRoutineFlow::CollectingTemporary {
            name: "Read".into(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            category: "Learning".into(),
        };

        let same = flow.clone().feed(FlowInput::text("maybe"), today());
        assert_eq!(same, flow);
        assert!(matches!(same.question(), Some(Question::YesNo { .. })));

        let next = flow.feed(FlowInput::text("Y"), today());
        assert!(matches!(next, AddRoutineFlow::CollectingEndDate { .. }));
    }

    #[test]
    fn test_running_out_of_answers_aborts() {
        let flow = AddRoutineFlow::run([FlowInput::text("Read")], today());
        assert_eq!(flow, AddRoutineFlow::Aborted(None));
    }

    #[test]
    fn test_finished_flow_ignores_input() {
        let flow = AddRoutineFlow::Aborted(None).feed(FlowInput::text("Read"), today());
        assert_eq!(flow, AddRoutineFlow::Aborted(None));
        assert_eq!(flow.question(), None);
    }

    #[test]
    fn test_every_two_digit_time_is_kept_as_typed() {
        for hour in 0..24 {
            for minute in [0, 1, 30, 59] {
                let typed = format!("{hour:02}:{minute:02}");
                let time = parse_time(&typed).unwrap();
                assert_eq!(format_time(time), typed);
            }
        }
        assert_eq!(
            parse_time("00:00"),
            Ok(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_short_times_are_rejected() {
        for typed in ["7:05", "07:5", "7:5", "007:05", "07:005", "24:00", "07-05", ""] {
            assert_eq!(parse_time(typed), Err(RoutineInputError::InvalidTime), "{typed:?}");
        }
    }

    #[test]
    fn test_parsers() {
        assert_eq!(
            parse_time(" 23:59 "),
            Ok(NaiveTime::from_hms_opt(23, 59, 0).unwrap())
        );
        assert_eq!(parse_time("12:60"), Err(RoutineInputError::InvalidTime));
        assert_eq!(
            parse_end_date("2024-05-11", today()),
            Ok(NaiveDate::from_ymd_opt(2024, 5, 11).unwrap())
        );
        assert_eq!(
            parse_end_date("2024-02-30", today()),
            Err(RoutineInputError::InvalidDate)
        );
        assert_eq!(parse_yes_no("No"), Some(false));
        assert_eq!(parse_yes_no(""), None);
    }
}
