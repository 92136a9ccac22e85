mod common;

use common::{bearer, json_body, TestApp, TEST_PASSWORD};
use poem::http::StatusCode;
use registry_backend::types::internal::auth::Role;
use serde_json::json;

#[tokio::test]
async fn test_health_reports_healthy() {
    let app = TestApp::new();

    let resp = app.client.get("/api/health").send().await;

    resp.assert_status_is_ok();
    let body = json_body(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_register_then_duplicate_email_is_rejected() {
    let app = TestApp::new();
    let payload = json!({ "name": "Ani", "email": "ani@pn.go.id", "password": "rahasia123" });

    let first = app.client.post("/api/auth/register").body_json(&payload).send().await;
    first.assert_status(StatusCode::CREATED);
    let body = json_body(first).await;
    assert_eq!(body["message"], "User registered successfully.");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));

    let second = app.client.post("/api/auth/register").body_json(&payload).send().await;
    second.assert_status(StatusCode::BAD_REQUEST);
    let body = json_body(second).await;
    assert_eq!(body["error"], "conflict");

    assert_eq!(app.app_data.credential_store.all_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_defaults_role_and_rejects_unknown_role() {
    let app = TestApp::new();

    let resp = app
        .client
        .post("/api/auth/register")
        .body_json(&json!({ "name": "Budi", "email": "budi@pn.go.id", "password": "rahasia123", "role": "hakim" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = app
        .client
        .post("/api/auth/register")
        .body_json(&json!({ "name": "Budi", "email": "budi@pn.go.id", "password": "rahasia123" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    let user = app
        .app_data
        .credential_store
        .find_by_email("budi@pn.go.id")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, Role::Petugas);
}

#[tokio::test]
async fn test_login_failure_is_uniform() {
    let app = TestApp::new();
    app.create_user("Ani", "ani@pn.go.id", Role::Petugas).await;

    let unknown = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "nobody@pn.go.id", "password": TEST_PASSWORD }))
        .send()
        .await;
    let wrong_password = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "ani@pn.go.id", "password": "salah" }))
        .send()
        .await;

    unknown.assert_status(StatusCode::UNAUTHORIZED);
    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(unknown).await, json_body(wrong_password).await);
}

#[tokio::test]
async fn test_login_attempts_are_written_to_access_log() {
    let app = TestApp::new();
    let admin_token = app.token_for("admin@pn.go.id", Role::Admin).await;

    app.client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "ghost@pn.go.id", "password": "whatever" }))
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Missing password never reaches the credential check
    let missing = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "ghost@pn.go.id" }))
        .send()
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(json_body(missing).await["message"], "Please provide email and password.");

    app.flush_logs().await;

    let resp = app
        .client
        .get("/api/logs/access")
        .header("Authorization", bearer(&admin_token))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = json_body(resp).await;

    assert_eq!(body["total"], 2);
    assert_eq!(body["limit"], 15);
    let rows = body["data"].as_array().unwrap();
    assert!(rows.iter().any(|r| r["user"] == "admin@pn.go.id" && r["status"] == "berhasil"));
    assert!(rows.iter().any(|r| r["user"] == "ghost@pn.go.id" && r["status"] == "gagal"));
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = TestApp::new();

    let missing = app.client.get("/api/auth/me").send().await;
    missing.assert_status(StatusCode::UNAUTHORIZED);

    let garbage = app
        .client
        .get("/api/auth/me")
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await;
    garbage.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::new();
    let token = app.token_for("ani@pn.go.id", Role::Petugas).await;
    let user = app
        .app_data
        .credential_store
        .find_by_email("ani@pn.go.id")
        .await
        .unwrap()
        .unwrap();

    app.app_data.credential_store.delete_user(&user.id).await.unwrap();

    let resp = app.client.get("/api/auth/me").header("Authorization", bearer(&token)).send().await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}
