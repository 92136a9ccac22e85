// API layer - HTTP endpoints
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod helpers;
pub mod logs;
pub mod records;
pub mod users;

use poem::{EndpointExt, IntoEndpoint, Route};
use poem_openapi::OpenApiService;
use std::sync::Arc;

pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use health::HealthApi;
pub use logs::LogsApi;
pub use records::RecordsApi;
pub use users::UsersApi;

use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, RecordCoordinator, UserCoordinator};

/// Compose every API under `/api` and the Swagger UI under `/swagger`
///
/// # Arguments
/// * `app_data` - Shared stores and configuration
/// * `server_url` - Base URL advertised in the OpenAPI document
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> Route {
    let auth_coordinator = Arc::new(AuthCoordinator::new(app_data.clone()));
    let user_coordinator = Arc::new(UserCoordinator::new(app_data.clone()));
    let record_coordinator = Arc::new(RecordCoordinator::new(app_data.clone()));

    let apis = (
        HealthApi,
        AuthApi::new(auth_coordinator.clone()),
        UsersApi::new(auth_coordinator.clone(), user_coordinator),
        LogsApi::new(auth_coordinator.clone(), app_data.audit_store.clone()),
        DashboardApi::new(auth_coordinator.clone(), record_coordinator.clone()),
        RecordsApi::new(auth_coordinator, record_coordinator),
    );

    let api_service = OpenApiService::new(apis, "Court Registry API", env!("CARGO_PKG_VERSION"))
        .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let api = api_service
        .into_endpoint()
        .catch_error(helpers::param_error)
        .catch_error(helpers::payload_error);

    Route::new().nest("/api", api).nest("/swagger", ui)
}
