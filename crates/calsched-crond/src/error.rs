//! Error types for the calsched-crond crate.

use calsched_calendar::CalendarError;
use thiserror::Error;

/// All errors that can originate from crontab operations.
#[derive(Debug, Error)]
pub enum CrondError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Underlying I/O failure (read, write, spawn).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A search expression built from entry values did not compile.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Neither a crontab file nor a crontab binary was configured.
    #[error("no crontab file was specified")]
    NoCrontabFile,

    /// The file carries a generated "DO NOT EDIT" header.
    #[error("refusing to change crontab with \"DO NOT EDIT\": {file:?}")]
    DoNotEdit { file: String },

    #[error("max file size of {max} bytes exceeded in {file:?}")]
    FileTooLarge { file: String, max: usize },

    /// The crontab binary exited with a failure.
    #[error("{binary} failed: {output}")]
    Command { binary: String, output: String },

    /// A cron time specification could not be read.
    #[error("invalid cron line {line:?}: {reason}")]
    InvalidLine { line: String, reason: String },

    #[error("expected 5 cron time fields but found {found} in {line:?}")]
    FieldCount { found: usize, line: String },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, CrondError>;
