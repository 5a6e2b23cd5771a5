use thiserror::Error;

#[derive(Debug, Error)]
pub enum MayfinError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Duplicate financial statements for fiscal year {year}")]
    DuplicateFiscalYear { year: i32 },

    #[error("Invalid scoring policy: {field} — {reason}")]
    InvalidPolicy { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MayfinError {
    fn from(e: serde_json::Error) -> Self {
        MayfinError::SerializationError(e.to_string())
    }
}
