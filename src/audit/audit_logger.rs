use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::stores::AuditStore;
use crate::types::internal::audit::{AccessEntry, AccessStatus, ActivityEntry};
use crate::types::internal::context::RequestContext;

/// Entries waiting for the worker before new ones are dropped
pub const AUDIT_QUEUE_CAPACITY: usize = 1024;

enum AuditCommand {
    Access(AccessEntry),
    Activity(ActivityEntry),
    Flush(oneshot::Sender<()>),
}

impl AuditCommand {
    fn describe(&self) -> String {
        match self {
            AuditCommand::Access(entry) => format!("access {} {}", entry.user, entry.status.as_str()),
            AuditCommand::Activity(entry) => format!("{} {}", entry.action, entry.target_id),
            AuditCommand::Flush(_) => "flush".to_string(),
        }
    }
}

/// Detached writer for access and activity rows
///
/// Handlers enqueue entries after their write has committed and return
/// immediately. A single worker task appends rows in arrival order; write
/// failures, and entries arriving while the queue is full, are logged and dropped.
#[derive(Clone)]
pub struct AuditLogger {
    sender: mpsc::Sender<AuditCommand>,
}

impl AuditLogger {
    /// Start the worker on the current Tokio runtime
    ///
    /// # Arguments
    /// * `audit_store` - Destination for log rows
    pub fn spawn(audit_store: Arc<AuditStore>) -> Self {
        Self::spawn_with_capacity(audit_store, AUDIT_QUEUE_CAPACITY)
    }

    fn spawn_with_capacity(audit_store: Arc<AuditStore>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        tokio::spawn(run_worker(audit_store, receiver));
        Self { sender }
    }

    fn enqueue(&self, command: AuditCommand) {
        match self.sender.try_send(command) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(command)) => {
                tracing::error!(entry = %command.describe(), "{}", AuditError::QueueFull);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!("{}", AuditError::WriterClosed);
            }
        }
    }

    /// Record a login attempt
    ///
    /// # Arguments
    /// * `ctx` - Origin of the attempt
    /// * `submitted_email` - Email as typed, whether or not it exists
    /// * `status` - Outcome of the attempt
    pub fn log_access(&self, ctx: &RequestContext, submitted_email: &str, status: AccessStatus) {
        let entry = AccessEntry::new(submitted_email, &ctx.client.ip, &ctx.client.browser, status);
        self.enqueue(AuditCommand::Access(entry));
    }

    /// Record a committed mutation
    ///
    /// # Arguments
    /// * `ctx` - Caller; the actor name falls back to `Unknown User`
    /// * `action` - Label such as `POST WARMEKING`
    /// * `target_id` - Identifier of the affected record
    pub fn log_activity(&self, ctx: &RequestContext, action: String, target_id: &str) {
        let entry = ActivityEntry::new(
            ctx.actor_name(),
            &ctx.client.ip,
            &ctx.client.browser,
            action,
            target_id,
        );
        self.enqueue(AuditCommand::Activity(entry));
    }

    /// Wait until every entry queued before this call has been written
    pub async fn flush(&self) -> Result<(), InternalError> {
        let (done, wait) = oneshot::channel();
        self.sender
            .send(AuditCommand::Flush(done))
            .await
            .map_err(|_| AuditError::WriterClosed)?;
        wait.await.map_err(|_| AuditError::WriterClosed)?;
        Ok(())
    }
}

async fn run_worker(audit_store: Arc<AuditStore>, mut receiver: mpsc::Receiver<AuditCommand>) {
    while let Some(command) = receiver.recv().await {
        match command {
            AuditCommand::Access(entry) => {
                if let Err(e) = audit_store.write_access(&entry).await {
                    tracing::error!(error = %e, user = %entry.user, "Failed to write access log");
                }
            }
            AuditCommand::Activity(entry) => {
                if let Err(e) = audit_store.write_activity(&entry).await {
                    tracing::error!(
                        error = %e,
                        action = %entry.action,
                        target_id = %entry.target_id,
                        "Failed to write activity log"
                    );
                }
            }
            AuditCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Audit worker stopped");
}
