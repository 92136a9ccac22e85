use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::internal::StoreError;
use crate::errors::InternalError;
use crate::stores::RecordStore;
use crate::types::internal::audit::Mutation;
use crate::types::internal::context::RequestContext;
use crate::types::list_query::{DateRange, ListQuery, Page};
use crate::types::schema::{EntitySchema, ALL_ENTITIES};

/// Orchestrates case-filing CRUD, dashboard counts and table lookups
pub struct RecordCoordinator {
    record_store: Arc<RecordStore>,
    audit_logger: AuditLogger,
}

impl RecordCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            record_store: app_data.record_store.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    pub async fn list(
        &self,
        schema: &EntitySchema,
        query: &ListQuery,
    ) -> Result<Page<Map<String, Value>>, InternalError> {
        self.record_store.list(schema, query).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        schema: &EntitySchema,
        input: &Map<String, Value>,
    ) -> Result<String, InternalError> {
        let id = self.record_store.create(schema, input).await?;
        self.audit_logger
            .log_activity(ctx, Mutation::Create.action(schema.activity_label), &id);
        Ok(id)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        schema: &EntitySchema,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<(), InternalError> {
        self.record_store.update(schema, id, input).await?;
        self.audit_logger
            .log_activity(ctx, Mutation::Update.action(schema.activity_label), id);
        Ok(())
    }

    pub async fn delete(
        &self,
        ctx: &RequestContext,
        schema: &EntitySchema,
        id: &str,
    ) -> Result<(), InternalError> {
        self.record_store.delete(schema, id).await?;
        self.audit_logger
            .log_activity(ctx, Mutation::Delete.action(schema.activity_label), id);
        Ok(())
    }

    /// Row counts per case-filing table, keyed by each schema's stats key
    pub async fn dashboard_stats(&self, range: &DateRange) -> Result<BTreeMap<String, u64>, InternalError> {
        let mut stats = BTreeMap::new();
        for schema in ALL_ENTITIES {
            let count = self.record_store.count(schema, range).await?;
            stats.insert(schema.stats_key.to_string(), count as u64);
        }
        Ok(stats)
    }

    /// Internal id of a table; `None` when no table has that name
    pub async fn sheet_gid(&self, name: &str) -> Result<Option<i64>, InternalError> {
        if name.trim().is_empty() {
            return Err(InternalError::validation("Nama sheet diperlukan."));
        }
        match self.record_store.table_id(name).await {
            Ok(id) => Ok(Some(id)),
            Err(InternalError::Store(StoreError::NotFound { .. })) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::test_app_data;
    use crate::types::internal::audit::LogKind;
    use crate::types::internal::context::ClientInfo;
    use crate::types::schema::{SURAT_KUASA_KHUSUS, WARMEKING};
    use serde_json::json;

    fn warmeking(date: &str) -> Map<String, Value> {
        json!({
            "tanggal_input": date,
            "permohonan_tentang": "Ahli waris",
            "nama_pewaris": "Alm. Sastro",
            "nama_ahli_waris": "Siti",
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_delete_writes_no_activity() {
        let app_data = test_app_data();
        let coordinator = RecordCoordinator::new(app_data.clone());
        let ctx = RequestContext::anonymous(ClientInfo::unknown());

        let id = coordinator.create(&ctx, &WARMEKING, &warmeking("2024-05-01")).await.unwrap();
        coordinator.delete(&ctx, &WARMEKING, &id).await.unwrap();
        assert!(coordinator.delete(&ctx, &WARMEKING, &id).await.is_err());
        app_data.audit_logger.flush().await.unwrap();

        let page = app_data
            .audit_store
            .list(LogKind::Activity, &ListQuery::new(1, 15))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|r| r["target_id"] == json!(id)));
    }

    #[tokio::test]
    async fn test_dashboard_counts_every_entity() {
        let app_data = test_app_data();
        let coordinator = RecordCoordinator::new(app_data);
        let ctx = RequestContext::anonymous(ClientInfo::unknown());
        coordinator.create(&ctx, &WARMEKING, &warmeking("2024-05-01")).await.unwrap();
        coordinator.create(&ctx, &WARMEKING, &warmeking("2024-06-01")).await.unwrap();

        let all = coordinator.dashboard_stats(&DateRange::default()).await.unwrap();
        let may = coordinator
            .dashboard_stats(&DateRange::parse(Some("2024-05-01"), Some("2024-05-31")).unwrap())
            .await
            .unwrap();

        assert_eq!(all.len(), 6);
        assert_eq!(all["warmeking"], 2);
        assert_eq!(all[SURAT_KUASA_KHUSUS.stats_key], 0);
        assert_eq!(may["warmeking"], 1);
    }

    #[tokio::test]
    async fn test_sheet_gid_lookup() {
        let coordinator = RecordCoordinator::new(test_app_data());

        assert!(coordinator.sheet_gid(WARMEKING.table).await.unwrap().is_some());
        assert_eq!(coordinator.sheet_gid("no_such_sheet").await.unwrap(), None);
        assert!(coordinator.sheet_gid(" ").await.is_err());
    }
}
