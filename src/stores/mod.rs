// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod credential_store;
pub mod record_store;
pub mod tabular;

pub use audit_store::AuditStore;
pub use credential_store::CredentialStore;
pub use record_store::RecordStore;
pub use tabular::{MemoryTabularStore, SheetsTabularStore, TabularStore};

use crate::types::internal::audit::LogKind;
use crate::types::schema::ALL_ENTITIES;

/// Memory backend with every table the application touches, header rows only
pub fn seeded_memory_store() -> MemoryTabularStore {
    let mut store = MemoryTabularStore::new();
    for schema in ALL_ENTITIES {
        store = store.with_table(schema.table, &schema.header());
    }
    store
        .with_table(credential_store::USERS_TABLE, credential_store::USER_COLUMNS)
        .with_table(LogKind::Access.table(), LogKind::Access.columns())
        .with_table(LogKind::Activity.table(), LogKind::Activity.columns())
}
