use thiserror::Error;

pub mod audit;
pub mod credential;
pub mod record;
pub mod store;

pub use audit::AuditError;
pub use credential::CredentialError;
pub use record::RecordError;
pub use store::StoreError;

/// Internal error type for store and coordinator operations
///
/// Infrastructure errors (store, parse, crypto) sit beside domain errors.
/// Not exposed via API - endpoints convert through `ApiError::from_internal_error`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl InternalError {
    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Record(RecordError::validation(message))
    }
}
