use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::stores::CredentialStore;
use crate::types::internal::audit::{Mutation, USERS_SUBSYSTEM};
use crate::types::internal::auth::{Role, User};
use crate::types::internal::context::RequestContext;
use crate::types::list_query::{ListQuery, Page};

fn parse_role(value: &str) -> Result<Role, InternalError> {
    Role::parse(value).ok_or_else(|| InternalError::validation("Invalid role."))
}

/// Administrative account management; callers must already hold an administrator role
pub struct UserCoordinator {
    credential_store: Arc<CredentialStore>,
    audit_logger: AuditLogger,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<User>, InternalError> {
        self.credential_store.list_users(query).await
    }

    /// Create an account with an explicit role
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<String, InternalError> {
        if [name, email, password, role].iter().any(|v| v.trim().is_empty()) {
            return Err(InternalError::validation("Name, email, password, and role are required."));
        }
        let role = parse_role(role)?;

        let user = self.credential_store.add_user(name, email, password, role).await?;
        self.audit_logger
            .log_activity(ctx, Mutation::Create.action(USERS_SUBSYSTEM), &user.id);
        Ok(user.id)
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
        email: &str,
        role: &str,
    ) -> Result<(), InternalError> {
        if [name, email, role].iter().any(|v| v.trim().is_empty()) {
            return Err(InternalError::validation("Name, email, and role are required."));
        }
        let role = parse_role(role)?;

        self.credential_store.update_profile(id, name, email, role).await?;
        self.audit_logger
            .log_activity(ctx, Mutation::Update.action(USERS_SUBSYSTEM), id);
        Ok(())
    }

    pub async fn delete_user(&self, ctx: &RequestContext, id: &str) -> Result<(), InternalError> {
        self.credential_store.delete_user(id).await?;
        self.audit_logger
            .log_activity(ctx, Mutation::Delete.action(USERS_SUBSYSTEM), id);
        Ok(())
    }
}
