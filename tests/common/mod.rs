// Common test utilities for integration tests
#![allow(dead_code)]

use poem::test::{TestClient, TestResponse};
use poem::Route;
use registry_backend::api::build_app;
use registry_backend::config::SecretManager;
use registry_backend::stores::seeded_memory_store;
use registry_backend::types::internal::auth::Role;
use registry_backend::AppData;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-16chars";
pub const TEST_PASSWORD: &str = "rahasia123";

/// Application over a fresh in-memory store plus a client for it
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub client: TestClient<Route>,
}

impl TestApp {
    pub fn new() -> Self {
        let app_data = Arc::new(AppData::with_store(
            Arc::new(seeded_memory_store()),
            Arc::new(SecretManager::from_parts(TEST_JWT_SECRET, TEST_PEPPER)),
            Duration::from_secs(3600),
        ));
        let client = TestClient::new(build_app(app_data.clone(), "http://localhost:3000"));
        Self { app_data, client }
    }

    /// Insert a user directly through the repository
    pub async fn create_user(&self, name: &str, email: &str, role: Role) -> String {
        self.app_data
            .credential_store
            .add_user(name, email, TEST_PASSWORD, role)
            .await
            .expect("Failed to create test user")
            .id
    }

    /// Log in and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let resp = self
            .client
            .post("/api/auth/login")
            .body_json(&json!({ "email": email, "password": password }))
            .send()
            .await;
        resp.assert_status_is_ok();
        let body = json_body(resp).await;
        body["token"].as_str().expect("token missing").to_string()
    }

    /// Create a user with `role` and return a token for them
    pub async fn token_for(&self, email: &str, role: Role) -> String {
        self.create_user("Test User", email, role).await;
        self.login(email, TEST_PASSWORD).await
    }

    /// Wait until queued audit rows are written
    pub async fn flush_logs(&self) {
        self.app_data
            .audit_logger
            .flush()
            .await
            .expect("Audit worker stopped");
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub async fn json_body(resp: TestResponse) -> Value {
    resp.0
        .into_body()
        .into_json::<Value>()
        .await
        .expect("Response body is not JSON")
}
