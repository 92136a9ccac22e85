use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{ColumnRange, Row, TabularStore};
use crate::errors::internal::StoreError;

struct MemoryTable {
    id: i64,
    rows: Vec<Row>,
}

/// Process-local tables with spreadsheet-like range semantics
pub struct MemoryTabularStore {
    tables: RwLock<HashMap<String, MemoryTable>>,
}

impl MemoryTabularStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Add a table whose first row is `header`
    pub fn with_table(self, name: &str, header: &[&str]) -> Self {
        let mut tables = self.tables.into_inner();
        let id = tables.len() as i64;
        tables.insert(
            name.to_string(),
            MemoryTable {
                id,
                rows: vec![header.iter().map(|h| h.to_string()).collect()],
            },
        );
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemoryTabularStore {
    fn default() -> Self {
        Self::new()
    }
}

fn project(row: &Row, columns: ColumnRange) -> Row {
    let mut cells: Row = row
        .iter()
        .skip(columns.first)
        .take(columns.width())
        .cloned()
        .collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

#[async_trait]
impl TabularStore for MemoryTabularStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn fetch_range(&self, table: &str, columns: ColumnRange) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables.read().await;
        let entry = tables.get(table).ok_or_else(|| StoreError::not_found(table))?;
        Ok(entry.rows.iter().map(|row| project(row, columns)).collect())
    }

    async fn append_row(&self, table: &str, columns: ColumnRange, row: Row) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(table).ok_or_else(|| StoreError::not_found(table))?;
        let mut stored = vec![String::new(); columns.first];
        stored.extend(row.into_iter().take(columns.width()));
        entry.rows.push(stored);
        Ok(())
    }

    async fn update_row(
        &self,
        table: &str,
        position: usize,
        columns: ColumnRange,
        row: Row,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(table).ok_or_else(|| StoreError::not_found(table))?;
        let target = entry
            .rows
            .get_mut(position)
            .ok_or_else(|| StoreError::not_found(format!("{}!{}", table, columns.a1_row(position))))?;

        if target.len() <= columns.last {
            target.resize(columns.last + 1, String::new());
        }
        for offset in 0..columns.width() {
            target[columns.first + offset] = row.get(offset).cloned().unwrap_or_default();
        }
        Ok(())
    }

    async fn delete_rows(&self, table: &str, start: usize, count: usize) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(table).ok_or_else(|| StoreError::not_found(table))?;
        let end = start.saturating_add(count);
        if end > entry.rows.len() {
            return Err(StoreError::not_found(format!("{} rows {}..{}", table, start, end)));
        }
        entry.rows.drain(start..end);
        Ok(())
    }

    async fn clear_range(&self, table: &str, columns: ColumnRange) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let entry = tables.get_mut(table).ok_or_else(|| StoreError::not_found(table))?;
        for row in entry.rows.iter_mut() {
            for cell in row.iter_mut().skip(columns.first).take(columns.width()) {
                cell.clear();
            }
        }
        Ok(())
    }

    async fn table_id(&self, table: &str) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .map(|t| t.id)
            .ok_or_else(|| StoreError::not_found(table))
    }
}
