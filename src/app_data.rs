use std::sync::Arc;
use std::time::Duration;

use crate::audit::AuditLogger;
use crate::config::{ApplicationError, BootstrapSettings, SecretManager, StoreBackend};
use crate::stores::{
    seeded_memory_store, AuditStore, CredentialStore, RecordStore, SheetsTabularStore, TabularStore,
};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once at startup and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ tabular_store (Arc<dyn TabularStore>)
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ record_store (Arc<RecordStore>)
///   ├─ credential_store (Arc<CredentialStore>)
///   ├─ audit_store (Arc<AuditStore>)
///   └─ audit_logger (AuditLogger, background worker)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
/// ```
pub struct AppData {
    pub tabular_store: Arc<dyn TabularStore>,
    pub secret_manager: Arc<SecretManager>,
    pub record_store: Arc<RecordStore>,
    pub credential_store: Arc<CredentialStore>,
    pub audit_store: Arc<AuditStore>,
    pub audit_logger: AuditLogger,
    pub token_ttl: Duration,
}

impl AppData {
    /// Build the configured store backend and everything layered on it
    ///
    /// Must run inside a Tokio runtime (the audit worker is spawned here).
    ///
    /// # Errors
    /// Returns `ApplicationError::StoreInit` when the Sheets credentials cannot be loaded
    pub fn init(
        settings: &BootstrapSettings,
        secret_manager: Arc<SecretManager>,
    ) -> Result<Self, ApplicationError> {
        let tabular_store: Arc<dyn TabularStore> = match settings.store_backend() {
            StoreBackend::Sheets => Arc::new(SheetsTabularStore::from_credentials_file(
                settings.credentials_file(),
                settings.spreadsheet_id(),
                settings.store_timeout(),
            )?),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Arc::new(seeded_memory_store())
            }
        };

        tracing::info!(backend = tabular_store.backend_tag(), "Tabular store ready");
        Ok(Self::with_store(tabular_store, secret_manager, settings.token_ttl()))
    }

    /// Wire every repository over an already-built backend
    pub fn with_store(
        tabular_store: Arc<dyn TabularStore>,
        secret_manager: Arc<SecretManager>,
        token_ttl: Duration,
    ) -> Self {
        let record_store = Arc::new(RecordStore::new(tabular_store.clone()));
        let credential_store = Arc::new(CredentialStore::new(
            tabular_store.clone(),
            secret_manager.password_pepper().to_string(),
        ));
        let audit_store = Arc::new(AuditStore::new(tabular_store.clone()));
        let audit_logger = AuditLogger::spawn(audit_store.clone());

        Self {
            tabular_store,
            secret_manager,
            record_store,
            credential_store,
            audit_store,
            audit_logger,
            token_ttl,
        }
    }
}
