use poem::Request;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, UserCoordinator};
use crate::errors::internal::CredentialError;
use crate::errors::{ApiError, InternalError};
use crate::types::dto::common::{CreatedResponse, MessageResponse};
use crate::types::dto::user::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserListResponse,
};
use crate::types::internal::auth::Role;
use crate::types::list_query::DEFAULT_LIMIT;

/// User management API endpoints
pub struct UsersApi {
    auth_coordinator: Arc<AuthCoordinator>,
    user_coordinator: Arc<UserCoordinator>,
}

impl UsersApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, user_coordinator: Arc<UserCoordinator>) -> Self {
        Self {
            auth_coordinator,
            user_coordinator,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// Account administration
    Users,
}

#[OpenApi]
impl UsersApi {
    /// List accounts (administrators only)
    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list_users(
        &self,
        req: &Request,
        search: Query<Option<String>>,
        page: Query<Option<i64>>,
        limit: Query<Option<i64>>,
    ) -> Result<Json<UserListResponse>, ApiError> {
        helpers::authorize(&self.auth_coordinator, req, Role::ADMINISTRATORS).await?;
        let query = helpers::list_query(None, None, search.0.as_deref(), page.0, limit.0, DEFAULT_LIMIT)?;

        let page = self.user_coordinator.list_users(&query).await?;
        Ok(Json(page.into()))
    }

    /// Create an account with an explicit role (administrators only)
    #[oai(path = "/users", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        req: &Request,
        body: Json<CreateUserRequest>,
    ) -> Result<CreatedResponse, ApiError> {
        let ctx = helpers::authorize(&self.auth_coordinator, req, Role::ADMINISTRATORS).await?;
        let id = self
            .user_coordinator
            .create_user(
                &ctx,
                body.name.as_deref().unwrap_or_default(),
                body.email.as_deref().unwrap_or_default(),
                body.password.as_deref().unwrap_or_default(),
                body.role.as_deref().unwrap_or_default(),
            )
            .await?;

        Ok(CreatedResponse::new("User created successfully.", id))
    }

    /// Update name, email and role (administrators only)
    #[oai(path = "/users/:id", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authorize(&self.auth_coordinator, req, Role::ADMINISTRATORS).await?;
        self.user_coordinator
            .update_user(
                &ctx,
                &id.0,
                body.name.as_deref().unwrap_or_default(),
                body.email.as_deref().unwrap_or_default(),
                body.role.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(|e| match e {
                InternalError::Credential(CredentialError::DuplicateEmail(_)) => {
                    ApiError::email_in_use()
                }
                other => ApiError::from_internal_error(other),
            })?;

        Ok(MessageResponse::new("User updated successfully."))
    }

    /// Delete an account (administrators only)
    #[oai(path = "/users/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(&self, req: &Request, id: Path<String>) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authorize(&self.auth_coordinator, req, Role::ADMINISTRATORS).await?;
        self.user_coordinator.delete_user(&ctx, &id.0).await?;

        Ok(MessageResponse::new("User deleted successfully."))
    }

    /// Change a password given the current one (any authenticated caller)
    #[oai(path = "/users/change-password/:id", method = "put", tag = "UserTags::Users")]
    async fn change_password(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticate(&self.auth_coordinator, req).await?;
        self.auth_coordinator
            .change_password(
                &ctx,
                &id.0,
                body.current_password.as_deref().unwrap_or_default(),
                body.new_password.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(|e| match e {
                InternalError::Credential(CredentialError::UserNotFound(_)) => {
                    ApiError::not_found("Pengguna tidak ditemukan.")
                }
                other => ApiError::from_internal_error(other),
            })?;

        Ok(MessageResponse::new("Kata sandi berhasil diubah."))
    }
}
