use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers;
use crate::coordinators::AuthCoordinator;
use crate::errors::ApiError;
use crate::types::dto::auth::{LoginRequest, MeResponse, RegisterRequest, TokenResponse};
use crate::types::dto::common::CreatedResponse;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
}

impl AuthApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>) -> Self {
        Self { auth_coordinator }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account (role defaults to `petugas`)
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<CreatedResponse, ApiError> {
        let body = body.0;
        let id = self
            .auth_coordinator
            .register(
                body.name.as_deref().unwrap_or_default(),
                body.email.as_deref().unwrap_or_default(),
                body.password.as_deref().unwrap_or_default(),
                body.role.as_deref(),
            )
            .await?;

        Ok(CreatedResponse::new("User registered successfully.", id))
    }

    /// Login with email and password to receive a bearer token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let ctx = helpers::anonymous_context(req);
        let token = self
            .auth_coordinator
            .login(
                &ctx,
                body.email.as_deref().unwrap_or_default(),
                body.password.as_deref().unwrap_or_default(),
            )
            .await?;

        Ok(Json(TokenResponse {
            status: "success".to_string(),
            token,
        }))
    }

    /// Current caller, with the role as stored now
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, req: &Request) -> Result<Json<MeResponse>, ApiError> {
        let ctx = helpers::authenticate(&self.auth_coordinator, req).await?;
        let user = ctx.user.ok_or_else(ApiError::not_logged_in)?;

        Ok(Json(MeResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
        }))
    }
}
