use poem::Request;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, RecordCoordinator};
use crate::errors::ApiError;
use crate::types::dto::records::SheetGidResponse;
use crate::types::list_query::DateRange;

/// Dashboard counts and report-link helpers
pub struct DashboardApi {
    auth_coordinator: Arc<AuthCoordinator>,
    record_coordinator: Arc<RecordCoordinator>,
}

impl DashboardApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, record_coordinator: Arc<RecordCoordinator>) -> Self {
        Self {
            auth_coordinator,
            record_coordinator,
        }
    }
}

#[derive(Tags)]
enum DashboardTags {
    Dashboard,
}

#[OpenApi]
impl DashboardApi {
    /// Rows per register whose date falls in the range; all rows without one
    #[oai(path = "/dashboard/stats", method = "get", tag = "DashboardTags::Dashboard")]
    async fn stats(
        &self,
        req: &Request,
        #[oai(name = "startDate")] start_date: Query<Option<String>>,
        #[oai(name = "endDate")] end_date: Query<Option<String>>,
    ) -> Result<Json<BTreeMap<String, u64>>, ApiError> {
        helpers::authenticate(&self.auth_coordinator, req).await?;
        let range = DateRange::parse(start_date.0.as_deref(), end_date.0.as_deref())
            .map_err(|e| ApiError::from_internal_error(e.into()))?;

        let stats = self.record_coordinator.dashboard_stats(&range).await?;
        Ok(Json(stats))
    }

    /// Internal id of a table by name
    #[oai(path = "/sheet-gid/:sheet_name", method = "get", tag = "DashboardTags::Dashboard")]
    async fn sheet_gid(
        &self,
        req: &Request,
        sheet_name: Path<String>,
    ) -> Result<Json<SheetGidResponse>, ApiError> {
        helpers::authenticate(&self.auth_coordinator, req).await?;

        match self.record_coordinator.sheet_gid(&sheet_name.0).await? {
            Some(gid) => Ok(Json(SheetGidResponse { gid })),
            None => Err(ApiError::not_found(format!(
                "Sheet dengan nama '{}' tidak ditemukan.",
                sheet_name.0
            ))),
        }
    }
}
