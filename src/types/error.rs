use thiserror::Error;

/// calscroll error types
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Initial date could not be interpreted
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Settings file is inconsistent or out of range
    #[error("config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for calscroll
pub type Result<T> = std::result::Result<T, CalendarError>;
