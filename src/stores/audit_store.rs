use serde_json::{Map, Value};
use std::cmp::Reverse;
use std::sync::Arc;

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::stores::tabular::{ColumnRange, Row, TabularStore};
use crate::types::internal::audit::{AccessEntry, ActivityEntry, LogKind, TIMESTAMP_COLUMN};
use crate::types::list_query::{paginate, parse_timestamp, ListQuery, Page};

/// Repository for the append-only access and activity logs
pub struct AuditStore {
    store: Arc<dyn TabularStore>,
}

impl AuditStore {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    fn range(kind: LogKind) -> ColumnRange {
        ColumnRange::leading(kind.columns().len())
    }

    async fn append(&self, kind: LogKind, row: Row) -> Result<(), InternalError> {
        self.store
            .append_row(kind.table(), Self::range(kind), row)
            .await
            .map_err(|e| AuditError::LogWriteFailed(e.to_string()))?;
        Ok(())
    }

    pub async fn write_access(&self, entry: &AccessEntry) -> Result<(), InternalError> {
        self.append(LogKind::Access, entry.to_row()).await
    }

    pub async fn write_activity(&self, entry: &ActivityEntry) -> Result<(), InternalError> {
        self.append(LogKind::Activity, entry.to_row()).await
    }

    /// Newest first, filtered by the entry timestamp
    ///
    /// Entries with an unparsable timestamp sort last.
    pub async fn list(
        &self,
        kind: LogKind,
        query: &ListQuery,
    ) -> Result<Page<Map<String, Value>>, InternalError> {
        let mut rows = self.store.fetch_range(kind.table(), Self::range(kind)).await?;
        if !rows.is_empty() {
            rows.remove(0);
        }

        fn timestamp(row: &Row) -> &str {
            row.get(TIMESTAMP_COLUMN).map(String::as_str).unwrap_or("")
        }

        let mut matching: Vec<Row> = rows
            .into_iter()
            .filter(|row| query.range.contains(timestamp(row)))
            .filter(|row| query.matches_search(row.iter().skip(1).map(String::as_str)))
            .collect();
        matching.sort_by_key(|row| Reverse(parse_timestamp(timestamp(row))));

        let columns = kind.columns();
        Ok(paginate(matching, query.page, query.limit).map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    (name.to_string(), Value::String(cell))
                })
                .collect()
        }))
    }
}
