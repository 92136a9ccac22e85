use poem::Request;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use serde_json::Value;
use std::sync::Arc;

use crate::api::helpers;
use crate::coordinators::{AuthCoordinator, RecordCoordinator};
use crate::errors::ApiError;
use crate::types::dto::common::{CreatedResponse, MessageResponse};
use crate::types::dto::records::RecordListResponse;
use crate::types::list_query::DEFAULT_LIMIT;
use crate::types::schema::{entity_by_slug, EntitySchema};

/// CRUD endpoints shared by the six case-filing registers
pub struct RecordsApi {
    auth_coordinator: Arc<AuthCoordinator>,
    record_coordinator: Arc<RecordCoordinator>,
}

impl RecordsApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, record_coordinator: Arc<RecordCoordinator>) -> Self {
        Self {
            auth_coordinator,
            record_coordinator,
        }
    }
}

fn schema_for(entity: &str) -> Result<&'static EntitySchema, ApiError> {
    entity_by_slug(entity).ok_or_else(|| ApiError::not_found(format!("Unknown register '{}'.", entity)))
}

#[derive(Tags)]
enum RecordTags {
    /// Case-filing registers: salinan-putusan, warmeking, surat-kuasa-insidentil,
    /// surat-kuasa-khusus, surat-keterangan-tidak-dipidana, surat-legalisasi
    Records,
}

#[OpenApi]
impl RecordsApi {
    /// List a register with optional date range, search and paging
    #[oai(path = "/:entity", method = "get", tag = "RecordTags::Records")]
    async fn list_records(
        &self,
        req: &Request,
        entity: Path<String>,
        #[oai(name = "startDate")] start_date: Query<Option<String>>,
        #[oai(name = "endDate")] end_date: Query<Option<String>>,
        search: Query<Option<String>>,
        page: Query<Option<i64>>,
        limit: Query<Option<i64>>,
    ) -> Result<Json<RecordListResponse>, ApiError> {
        helpers::authenticate(&self.auth_coordinator, req).await?;
        let schema = schema_for(&entity.0)?;
        let query = helpers::list_query(
            start_date.0.as_deref(),
            end_date.0.as_deref(),
            search.0.as_deref(),
            page.0,
            limit.0,
            DEFAULT_LIMIT,
        )?;

        let page = self.record_coordinator.list(schema, &query).await?;
        Ok(Json(page.into()))
    }

    /// Append a record; derived fees are computed server-side
    #[oai(path = "/:entity", method = "post", tag = "RecordTags::Records")]
    async fn create_record(
        &self,
        req: &Request,
        entity: Path<String>,
        body: Json<Value>,
    ) -> Result<CreatedResponse, ApiError> {
        let ctx = helpers::authenticate(&self.auth_coordinator, req).await?;
        let schema = schema_for(&entity.0)?;
        let input = helpers::into_object(body.0)?;

        let id = self.record_coordinator.create(&ctx, schema, &input).await?;
        Ok(CreatedResponse::new(schema.created_message, id))
    }

    /// Replace every field of a record, keeping its id and position
    #[oai(path = "/:entity/:id", method = "put", tag = "RecordTags::Records")]
    async fn update_record(
        &self,
        req: &Request,
        entity: Path<String>,
        id: Path<String>,
        body: Json<Value>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticate(&self.auth_coordinator, req).await?;
        let schema = schema_for(&entity.0)?;
        let input = helpers::into_object(body.0)?;

        self.record_coordinator.update(&ctx, schema, &id.0, &input).await?;
        Ok(MessageResponse::new("Data berhasil diperbarui."))
    }

    #[oai(path = "/:entity/:id", method = "delete", tag = "RecordTags::Records")]
    async fn delete_record(
        &self,
        req: &Request,
        entity: Path<String>,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticate(&self.auth_coordinator, req).await?;
        let schema = schema_for(&entity.0)?;

        self.record_coordinator.delete(&ctx, schema, &id.0).await?;
        Ok(MessageResponse::new("Data berhasil dihapus."))
    }
}
