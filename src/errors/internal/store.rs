use thiserror::Error;

/// Failures raised by a tabular store adapter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Connectivity or authorization failure talking to the remote store
    #[error("Tabular store unavailable during {operation}: {message}")]
    Unavailable { operation: String, message: String },

    /// Unknown table or range
    #[error("Table or range not found: {target}")]
    NotFound { target: String },

    /// Remote store asked us to back off
    #[error("Tabular store throttled during {operation}")]
    Throttled { operation: String },

    /// Client-side timeout elapsed
    #[error("Tabular store call {operation} timed out")]
    Timeout { operation: String },

    /// Response body could not be interpreted
    #[error("Malformed tabular store response for {operation}: {message}")]
    Malformed { operation: String, message: String },
}

impl StoreError {
    pub fn unavailable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn not_found(target: impl Into<String>) -> Self {
        Self::NotFound {
            target: target.into(),
        }
    }

    pub fn throttled(operation: impl Into<String>) -> Self {
        Self::Throttled {
            operation: operation.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn malformed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
