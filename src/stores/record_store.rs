use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::internal::RecordError;
use crate::errors::InternalError;
use crate::stores::tabular::{Row, TabularStore};
use crate::types::list_query::{paginate, DateRange, ListQuery, Page};
use crate::types::schema::EntitySchema;

/// Generic repository for the case-filing tables
///
/// Every operation loads the whole table; filtering, search and paging
/// happen in memory. Writes from this process are serialized so a
/// scan-then-write cannot interleave with another local write.
pub struct RecordStore {
    store: Arc<dyn TabularStore>,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Data rows only, header dropped
    async fn data_rows(&self, schema: &EntitySchema) -> Result<Vec<Row>, InternalError> {
        let mut rows = self.store.fetch_range(schema.table, schema.column_range()).await?;
        if !rows.is_empty() {
            rows.remove(0);
        }
        Ok(rows)
    }

    /// Row position (header included) of the record with `id`
    async fn locate(&self, schema: &EntitySchema, id: &str) -> Result<usize, InternalError> {
        let rows = self.store.fetch_range(schema.table, schema.column_range()).await?;
        rows.iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.first().map(String::as_str) == Some(id))
            .map(|(position, _)| position)
            .ok_or_else(|| RecordError::not_found(schema.table, id).into())
    }

    pub async fn list(
        &self,
        schema: &EntitySchema,
        query: &ListQuery,
    ) -> Result<Page<Map<String, Value>>, InternalError> {
        let rows = self.data_rows(schema).await?;

        let matching: Vec<Row> = rows
            .into_iter()
            .filter(|row| query.range.contains(schema.cell(row, schema.date_column)))
            .filter(|row| query.matches_search(schema.search_fields(row)))
            .collect();

        Ok(paginate(matching, query.page, query.limit).map(|row| schema.to_record(&row)))
    }

    pub async fn create(
        &self,
        schema: &EntitySchema,
        input: &Map<String, Value>,
    ) -> Result<String, InternalError> {
        let id = Uuid::new_v4().to_string();
        let row = schema.build_row(&id, input)?;

        let _guard = self.write_lock.lock().await;
        self.store
            .append_row(schema.table, schema.column_range(), row)
            .await?;

        tracing::info!(table = schema.table, id = %id, "Record created");
        Ok(id)
    }

    /// Full-row replace keeping the identifier and row position
    pub async fn update(
        &self,
        schema: &EntitySchema,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<(), InternalError> {
        let row = schema.build_row(id, input)?;

        let _guard = self.write_lock.lock().await;
        let position = self.locate(schema, id).await?;
        self.store
            .update_row(schema.table, position, schema.column_range(), row)
            .await?;

        tracing::info!(table = schema.table, id = %id, position, "Record updated");
        Ok(())
    }

    pub async fn delete(&self, schema: &EntitySchema, id: &str) -> Result<(), InternalError> {
        let _guard = self.write_lock.lock().await;
        let position = self.locate(schema, id).await?;
        self.store.delete_rows(schema.table, position, 1).await?;

        tracing::info!(table = schema.table, id = %id, position, "Record deleted");
        Ok(())
    }

    /// Data rows whose date column falls in `range`; all rows when the range is open
    pub async fn count(&self, schema: &EntitySchema, range: &DateRange) -> Result<usize, InternalError> {
        let rows = self.data_rows(schema).await?;
        Ok(rows
            .iter()
            .filter(|row| range.contains(schema.cell(row, schema.date_column)))
            .count())
    }

    /// Internal identifier of a table, for building report links
    pub async fn table_id(&self, table: &str) -> Result<i64, InternalError> {
        Ok(self.store.table_id(table).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::memory_store;
    use crate::types::list_query::DEFAULT_LIMIT;
    use crate::types::schema::{ColumnKind, ALL_ENTITIES, SALINAN_PUTUSAN, SURAT_LEGALISASI, WARMEKING};
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn salinan(date: &str, name: &str, qty: u64) -> Map<String, Value> {
        input(json!({
            "tanggal_input": date,
            "nama_pihak": name,
            "nomor_perkara": format!("{}/Pdt.G/2024", qty),
            "jumlah_lembaran": qty,
        }))
    }

    fn repo() -> RecordStore {
        RecordStore::new(memory_store())
    }

    #[tokio::test]
    async fn test_create_then_update_recomputes_fee_and_keeps_id() {
        let repo = repo();
        let id = repo
            .create(&SALINAN_PUTUSAN, &salinan("2024-03-01", "Budi", 4))
            .await
            .unwrap();

        let page = repo.list(&SALINAN_PUTUSAN, &ListQuery::new(1, DEFAULT_LIMIT)).await.unwrap();
        assert_eq!(page.items[0]["harga_pnbp"], json!(2000));

        repo.update(&SALINAN_PUTUSAN, &id, &salinan("2024-03-01", "Budi", 10))
            .await
            .unwrap();

        let page = repo.list(&SALINAN_PUTUSAN, &ListQuery::new(1, DEFAULT_LIMIT)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0]["id"], json!(id));
        assert_eq!(page.items[0]["harga_pnbp"], json!(5000));
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_calls() {
        let store = memory_store();
        let repo = RecordStore::new(store.clone());

        let err = repo
            .create(&SALINAN_PUTUSAN, &salinan("2024-03-01", "Budi", 0))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Record(RecordError::Validation { .. })));
        let rows = store.fetch_range(SALINAN_PUTUSAN.table, SALINAN_PUTUSAN.column_range()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_ids() {
        let repo = repo();

        let update = repo.update(&SALINAN_PUTUSAN, "nope", &salinan("2024-03-01", "Budi", 1)).await;
        assert!(matches!(update, Err(InternalError::Record(RecordError::NotFound { .. }))));

        let delete = repo.delete(&WARMEKING, "nope").await;
        assert!(matches!(delete, Err(InternalError::Record(RecordError::NotFound { .. }))));
    }

    #[tokio::test]
    async fn test_delete_twice_second_is_not_found() {
        let repo = repo();
        let id = repo
            .create(&SALINAN_PUTUSAN, &salinan("2024-03-01", "Budi", 2))
            .await
            .unwrap();

        repo.delete(&SALINAN_PUTUSAN, &id).await.unwrap();
        let again = repo.delete(&SALINAN_PUTUSAN, &id).await;

        assert!(matches!(again, Err(InternalError::Record(RecordError::NotFound { .. }))));
    }

    #[tokio::test]
    async fn test_delete_removes_only_target_row() {
        let repo = repo();
        let first = repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-01", "A", 1)).await.unwrap();
        let second = repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-02", "B", 1)).await.unwrap();
        let third = repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-03", "C", 1)).await.unwrap();

        repo.delete(&SALINAN_PUTUSAN, &second).await.unwrap();

        let ids: Vec<Value> = repo
            .list(&SALINAN_PUTUSAN, &ListQuery::new(1, DEFAULT_LIMIT))
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(first), json!(third)]);
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let repo = repo();
        for i in 1..=25 {
            repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-01", &format!("Pihak {}", i), 1))
                .await
                .unwrap();
        }

        let page = repo.list(&SALINAN_PUTUSAN, &ListQuery::new(2, 10)).await.unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0]["nama_pihak"], json!("Pihak 11"));
        assert_eq!(page.items[9]["nama_pihak"], json!("Pihak 20"));
    }

    #[tokio::test]
    async fn test_update_keeps_row_between_siblings() {
        let repo = repo();
        let a = repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-01", "A", 1)).await.unwrap();
        let b = repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-02", "B", 1)).await.unwrap();
        let c = repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-03", "C", 1)).await.unwrap();

        repo.update(&SALINAN_PUTUSAN, &b, &salinan("2024-04-09", "B revisi", 3))
            .await
            .unwrap();

        let items = repo
            .list(&SALINAN_PUTUSAN, &ListQuery::new(1, DEFAULT_LIMIT))
            .await
            .unwrap()
            .items;
        let ids: Vec<Value> = items.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(a), json!(b), json!(c)]);
        assert_eq!(items[1]["nama_pihak"], json!("B revisi"));
        assert_eq!(items[1]["tanggal_input"], json!("2024-04-09"));
        assert_eq!(items[1]["harga_pnbp"], json!(1500));
    }

    #[tokio::test]
    async fn test_submitted_fields_come_back_unchanged() {
        let repo = repo();

        for schema in ALL_ENTITIES {
            let mut submitted = Map::new();
            for column in schema.columns.iter().skip(1) {
                let value = match column.kind {
                    _ if column.name == schema.date_column => json!("2024-03-01"),
                    ColumnKind::Text => json!(format!("0123 =SUM(A1) {}", column.name)),
                    ColumnKind::Quantity => json!(3),
                    ColumnKind::Derived => continue,
                };
                submitted.insert(column.name.to_string(), value);
            }

            let id = repo.create(schema, &submitted).await.unwrap();
            let items = repo.list(schema, &ListQuery::new(1, DEFAULT_LIMIT)).await.unwrap().items;

            assert_eq!(items.len(), 1, "{}", schema.slug);
            let record = &items[0];
            assert_eq!(record["id"], json!(id), "{}", schema.slug);
            for (name, value) in &submitted {
                assert_eq!(&record[name], value, "{} {}", schema.slug, name);
            }
            if let Some(fee) = &schema.derived {
                assert_eq!(record[fee.amount], json!(3 * fee.unit_price), "{}", schema.slug);
            }
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_date_and_search() {
        let repo = repo();
        repo.create(&SALINAN_PUTUSAN, &salinan("2024-02-28", "Budi", 1)).await.unwrap();
        repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-15", "Budi Santoso", 1)).await.unwrap();
        repo.create(&SALINAN_PUTUSAN, &salinan("2024-03-20", "Ani", 1)).await.unwrap();

        let query = ListQuery::from_params(
            Some("2024-03-01"),
            Some("2024-03-31"),
            Some("budi"),
            None,
            None,
            DEFAULT_LIMIT,
        )
        .unwrap();
        let page = repo.list(&SALINAN_PUTUSAN, &query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0]["nama_pihak"], json!("Budi Santoso"));
    }

    #[tokio::test]
    async fn test_count_with_and_without_range() {
        let repo = repo();
        let bundle = |date: &str| input(json!({"tanggal": date, "nomor_perkara": "1/Pid", "jumlah_bandel": 1}));
        repo.create(&SURAT_LEGALISASI, &bundle("2024-01-10")).await.unwrap();
        repo.create(&SURAT_LEGALISASI, &bundle("2024-02-10")).await.unwrap();

        let all = repo.count(&SURAT_LEGALISASI, &DateRange::default()).await.unwrap();
        let february = repo
            .count(&SURAT_LEGALISASI, &DateRange::parse(Some("2024-02-01"), Some("2024-02-29")).unwrap())
            .await
            .unwrap();

        assert_eq!(all, 2);
        assert_eq!(february, 1);
    }
}
