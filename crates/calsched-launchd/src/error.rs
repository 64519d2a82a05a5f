use calsched_calendar::CalendarError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchdError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// A calendar interval key other than Month, Day, Weekday, Hour or Minute.
    #[error("Unknown calendar interval key: {0:?}")]
    UnknownKey(String),
}

pub type Result<T> = std::result::Result<T, LaunchdError>;
