use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuditError {
    #[error("Failed to write audit log: {0}")]
    LogWriteFailed(String),

    /// The queue is at capacity; the entry was dropped
    #[error("Audit queue is full")]
    QueueFull,

    /// The background writer has shut down
    #[error("Audit writer is no longer running")]
    WriterClosed,
}
