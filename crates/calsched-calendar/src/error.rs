use thiserror::Error;

/// Errors that can occur while building or parsing a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// A value was inserted outside of the field's `[min, max]` domain.
    #[error("Value outside of range: {value} is not within {min}..{max}")]
    OutOfRange { value: u32, min: u32, max: u32 },

    /// A list item could not be read as a number or `a..b` range.
    #[error("Invalid value {token:?}: {reason}")]
    InvalidToken { token: String, reason: String },

    /// The schedule text was empty.
    #[error("Empty schedule")]
    EmptySchedule,

    /// The text matched neither a keyword nor any of the grammar patterns.
    #[error("Unrecognized calendar expression: {0:?}")]
    UnrecognizedExpression(String),

    /// The text matched a pattern but one of its fields was rejected.
    #[error("Invalid calendar expression {input:?}: {source}")]
    InvalidExpression {
        input: String,
        #[source]
        source: Box<CalendarError>,
    },
}

pub type Result<T> = std::result::Result<T, CalendarError>;
