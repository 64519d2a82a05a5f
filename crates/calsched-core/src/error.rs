use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalschedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid scheduler: {0}")]
    InvalidScheduler(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalschedError {
    /// Short error code string, stable across releases (used for exit diagnostics).
    pub fn code(&self) -> &'static str {
        match self {
            CalschedError::Config(_) => "CONFIG_ERROR",
            CalschedError::InvalidScheduler(_) => "INVALID_SCHEDULER",
            CalschedError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, CalschedError>;
