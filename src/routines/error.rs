use thiserror::Error;

/// Rejections of user input during the add flow. Every variant is shown to the user as a blocking
/// notification and leaves the store untouched.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum RoutineInputError {
    #[error("Please enter a valid time in HH:MM format.")]
    InvalidTime,
    #[error("Please enter a valid date in YYYY-MM-DD format.")]
    InvalidDate,
    #[error("End date must be in the future.")]
    EndDateNotInFuture,
    #[error("Only temporary routines can have an end date.")]
    EndDateWithoutTemporary,
}

impl RoutineInputError {
    /// Title of the notification.
    pub fn title(&self) -> &'static str {
        match self {
            RoutineInputError::InvalidTime => "Invalid time",
            RoutineInputError::InvalidDate
            | RoutineInputError::EndDateNotInFuture
            | RoutineInputError::EndDateWithoutTemporary => "Invalid date",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("There is no routine named {0:?}")]
    UnknownRoutine(String),
    #[error("Routine {0:?} was already completed today or its time has passed")]
    NotCompletable(String),
}
