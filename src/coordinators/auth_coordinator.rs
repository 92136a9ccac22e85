use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::stores::CredentialStore;
use crate::types::internal::audit::{AccessStatus, Mutation, USERS_SUBSYSTEM};
use crate::types::internal::auth::{Claims, Role, User};
use crate::types::internal::context::{ClientInfo, RequestContext};

/// Minimum length of a password set through change-password
pub const MIN_NEW_PASSWORD_LENGTH: usize = 6;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Authentication coordinator that orchestrates registration, login and token resolution
pub struct AuthCoordinator {
    credential_store: Arc<CredentialStore>,
    token_provider: Arc<TokenProvider>,
    audit_logger: AuditLogger,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing all stores and configuration
    pub fn new(app_data: Arc<AppData>) -> Self {
        let token_provider = Arc::new(TokenProvider::new(
            app_data.secret_manager.clone(),
            app_data.token_ttl,
        ));

        Self {
            credential_store: app_data.credential_store.clone(),
            token_provider,
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Self-service registration
    ///
    /// # Returns
    /// * `Result<String, InternalError>` - Id of the new account
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<String, InternalError> {
        if is_blank(name) || is_blank(email) || is_blank(password) {
            return Err(InternalError::validation("Please provide name, email, and password."));
        }
        let role = Role::parse(role.unwrap_or("")).ok_or_else(|| InternalError::validation("Invalid role."))?;

        let user = self.credential_store.add_user(name, email, password, role).await?;
        Ok(user.id)
    }

    /// Orchestrate a login with access logging
    ///
    /// Every attempt that reaches the credential check writes an access row
    /// keyed by the submitted email.
    ///
    /// # Returns
    /// * `Result<String, InternalError>` - Signed bearer token
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<String, InternalError> {
        if is_blank(email) || is_blank(password) {
            return Err(InternalError::validation("Please provide email and password."));
        }

        let user = match self.credential_store.verify_credentials(email, password).await {
            Ok(user) => user,
            Err(InternalError::Credential(CredentialError::InvalidCredentials)) => {
                tracing::debug!(request_id = %ctx.request_id.0, "Login rejected");
                self.audit_logger.log_access(ctx, email, AccessStatus::Failure);
                return Err(CredentialError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let (token, jti) = self.token_provider.generate_jwt(&user)?;
        self.audit_logger.log_access(ctx, email, AccessStatus::Success);

        tracing::info!(user_id = %user.id, jti = %jti, "Login succeeded");
        Ok(token)
    }

    /// Verify a bearer token and re-read its subject from storage
    pub async fn resolve_token(&self, token: &str) -> Result<(Claims, User), InternalError> {
        let claims = self.token_provider.validate_jwt(token)?;

        let user = self
            .credential_store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| CredentialError::SubjectGone {
                user_id: claims.sub.clone(),
            })?;

        Ok((claims, user))
    }

    /// Build an authenticated request context from an optional bearer token
    pub async fn authenticate(
        &self,
        client: ClientInfo,
        bearer: Option<&str>,
    ) -> Result<RequestContext, InternalError> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(CredentialError::MissingToken)?;

        let (claims, user) = self.resolve_token(token).await?;
        Ok(RequestContext::anonymous(client).with_user(claims, user))
    }

    /// Change a password after checking the current one
    ///
    /// The target comes from the path; it is not compared with the caller.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(InternalError::validation("Kata sandi lama dan baru wajib diisi."));
        }
        if new_password.chars().count() < MIN_NEW_PASSWORD_LENGTH {
            return Err(InternalError::validation("Kata sandi baru minimal 6 karakter."));
        }

        self.credential_store
            .change_password(user_id, current_password, new_password)
            .await?;

        self.audit_logger
            .log_activity(ctx, Mutation::Update.action(USERS_SUBSYSTEM), user_id);
        Ok(())
    }
}

/// Reject callers whose live role is not in `allowed`
pub fn require_role(ctx: &RequestContext, allowed: &[Role]) -> Result<(), InternalError> {
    match ctx.role() {
        Some(role) if allowed.contains(&role) => Ok(()),
        Some(role) => Err(CredentialError::Forbidden {
            role: role.to_string(),
        }
        .into()),
        None => Err(CredentialError::MissingToken.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::test_app_data;
    use crate::types::internal::audit::LogKind;
    use crate::types::list_query::ListQuery;

    fn ctx() -> RequestContext {
        RequestContext::anonymous(ClientInfo::unknown())
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let coordinator = AuthCoordinator::new(test_app_data());

        let result = coordinator.register("Ani", "  ", "rahasia123", None).await;

        assert!(matches!(result, Err(InternalError::Record(_))));
    }

    #[tokio::test]
    async fn test_register_defaults_to_petugas() {
        let app_data = test_app_data();
        let coordinator = AuthCoordinator::new(app_data.clone());

        let id = coordinator.register("Ani", "ani@pn.go.id", "rahasia123", None).await.unwrap();

        let user = app_data.credential_store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Petugas);
    }

    #[tokio::test]
    async fn test_login_writes_access_rows() {
        let app_data = test_app_data();
        let coordinator = AuthCoordinator::new(app_data.clone());
        coordinator.register("Ani", "ani@pn.go.id", "rahasia123", None).await.unwrap();

        assert!(coordinator.login(&ctx(), "ani@pn.go.id", "wrong").await.is_err());
        assert!(coordinator.login(&ctx(), "ani@pn.go.id", "rahasia123").await.is_ok());
        app_data.audit_logger.flush().await.unwrap();

        let page = app_data
            .audit_store
            .list(LogKind::Access, &ListQuery::new(1, 15))
            .await
            .unwrap();
        let mut statuses: Vec<&str> = page.items.iter().map(|r| r["status"].as_str().unwrap()).collect();
        statuses.sort();
        assert_eq!(statuses, vec!["berhasil", "gagal"]);
    }

    #[tokio::test]
    async fn test_resolve_token_rereads_role() {
        let app_data = test_app_data();
        let coordinator = AuthCoordinator::new(app_data.clone());
        let id = coordinator.register("Ani", "ani@pn.go.id", "rahasia123", None).await.unwrap();
        let token = coordinator.login(&ctx(), "ani@pn.go.id", "rahasia123").await.unwrap();

        app_data
            .credential_store
            .update_profile(&id, "Ani", "ani@pn.go.id", Role::Admin)
            .await
            .unwrap();

        let (claims, user) = coordinator.resolve_token(&token).await.unwrap();
        assert_eq!(claims.role, Role::Petugas);
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_rejected() {
        let app_data = test_app_data();
        let coordinator = AuthCoordinator::new(app_data.clone());
        let id = coordinator.register("Ani", "ani@pn.go.id", "rahasia123", None).await.unwrap();
        let token = coordinator.login(&ctx(), "ani@pn.go.id", "rahasia123").await.unwrap();

        app_data.credential_store.delete_user(&id).await.unwrap();

        let result = coordinator.authenticate(ClientInfo::unknown(), Some(&token)).await;
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::SubjectGone { .. }))
        ));
    }

    #[tokio::test]
    async fn test_change_password_validation_order() {
        let coordinator = AuthCoordinator::new(test_app_data());

        let short = coordinator.change_password(&ctx(), "ghost", "old-pass", "12345").await;
        let missing = coordinator.change_password(&ctx(), "ghost", "", "123456").await;
        let absent = coordinator.change_password(&ctx(), "ghost", "old-pass", "123456").await;

        assert!(matches!(short, Err(InternalError::Record(_))));
        assert!(matches!(missing, Err(InternalError::Record(_))));
        assert!(matches!(
            absent,
            Err(InternalError::Credential(CredentialError::UserNotFound(_)))
        ));
    }

    #[test]
    fn test_require_role() {
        let user = User {
            id: "u1".to_string(),
            name: "Ani".to_string(),
            email: "ani@pn.go.id".to_string(),
            password_hash: String::new(),
            created_at: String::new(),
            role: Role::Petugas,
        };
        let claims = Claims {
            sub: "u1".to_string(),
            email: "ani@pn.go.id".to_string(),
            role: Role::Petugas,
            iat: 0,
            exp: 0,
            jti: "j".to_string(),
        };
        let ctx = ctx().with_user(claims, user);

        assert!(require_role(&ctx, &[Role::Petugas]).is_ok());
        assert!(matches!(
            require_role(&ctx, Role::ADMINISTRATORS),
            Err(InternalError::Credential(CredentialError::Forbidden { .. }))
        ));
    }
}
