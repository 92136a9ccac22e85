use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::client_info::ClientInfo;
use crate::types::internal::auth::{Claims, Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// Request context that flows from the API layer into coordinators
///
/// Carries the origin of the request for audit rows and, once the bearer
/// token has been resolved, the live user record.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub client: ClientInfo,
    /// Claims of the verified token, if any
    pub claims: Option<Claims>,
    /// User re-read from storage after token verification
    pub user: Option<User>,
}

impl RequestContext {
    pub fn anonymous(client: ClientInfo) -> Self {
        Self {
            request_id: RequestId::new(),
            client,
            claims: None,
            user: None,
        }
    }

    pub fn with_user(mut self, claims: Claims, user: User) -> Self {
        self.claims = Some(claims);
        self.user = Some(user);
        self
    }

    /// Live role of the caller
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Display name written into activity rows
    pub fn actor_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "Unknown User".to_string())
    }
}
