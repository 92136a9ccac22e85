use thiserror::Error;

/// Record-level failures raised by the repositories
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Missing or malformed input, reported back to the caller verbatim
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// No row carries the requested identifier
    #[error("Record {id} not found in {table}")]
    NotFound { table: String, id: String },
}

impl RecordError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
            id: id.into(),
        }
    }
}
