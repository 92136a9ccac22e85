// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;
use std::time::Duration;

use crate::app_data::AppData;
use crate::config::SecretManager;
use crate::stores::{seeded_memory_store, MemoryTabularStore};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-16chars";

/// In-memory backend with every table and header already created
pub fn memory_store() -> Arc<MemoryTabularStore> {
    Arc::new(seeded_memory_store())
}

/// Full application wiring over a fresh in-memory backend
///
/// Must be called from inside a Tokio runtime (spawns the audit worker).
pub fn test_app_data() -> Arc<AppData> {
    Arc::new(AppData::with_store(
        memory_store(),
        Arc::new(SecretManager::from_parts(TEST_JWT_SECRET, TEST_PEPPER)),
        Duration::from_secs(3600),
    ))
}
