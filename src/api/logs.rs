use poem::Request;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers;
use crate::coordinators::AuthCoordinator;
use crate::errors::ApiError;
use crate::stores::AuditStore;
use crate::types::dto::records::LogListResponse;
use crate::types::internal::audit::LogKind;
use crate::types::internal::auth::Role;
use crate::types::list_query::DEFAULT_LOG_LIMIT;

/// Read access to the audit logs (administrators only)
pub struct LogsApi {
    auth_coordinator: Arc<AuthCoordinator>,
    audit_store: Arc<AuditStore>,
}

impl LogsApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, audit_store: Arc<AuditStore>) -> Self {
        Self {
            auth_coordinator,
            audit_store,
        }
    }

    async fn list(
        &self,
        req: &Request,
        kind: LogKind,
        start_date: Option<&str>,
        end_date: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Json<LogListResponse>, ApiError> {
        helpers::authorize(&self.auth_coordinator, req, Role::ADMINISTRATORS).await?;
        let query = helpers::list_query(start_date, end_date, None, page, limit, DEFAULT_LOG_LIMIT)?;

        let page = self.audit_store.list(kind, &query).await?;
        Ok(Json(page.into()))
    }
}

#[derive(Tags)]
enum LogTags {
    /// Access and activity logs
    Logs,
}

#[OpenApi]
impl LogsApi {
    /// Login attempts, newest first
    #[oai(path = "/logs/access", method = "get", tag = "LogTags::Logs")]
    async fn access_logs(
        &self,
        req: &Request,
        #[oai(name = "startDate")] start_date: Query<Option<String>>,
        #[oai(name = "endDate")] end_date: Query<Option<String>>,
        page: Query<Option<i64>>,
        limit: Query<Option<i64>>,
    ) -> Result<Json<LogListResponse>, ApiError> {
        self.list(req, LogKind::Access, start_date.0.as_deref(), end_date.0.as_deref(), page.0, limit.0)
            .await
    }

    /// Committed mutations, newest first
    #[oai(path = "/logs/activity", method = "get", tag = "LogTags::Logs")]
    async fn activity_logs(
        &self,
        req: &Request,
        #[oai(name = "startDate")] start_date: Query<Option<String>>,
        #[oai(name = "endDate")] end_date: Query<Option<String>>,
        page: Query<Option<i64>>,
        limit: Query<Option<i64>>,
    ) -> Result<Json<LogListResponse>, ApiError> {
        self.list(req, LogKind::Activity, start_date.0.as_deref(), end_date.0.as_deref(), page.0, limit.0)
            .await
    }
}
