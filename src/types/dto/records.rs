use poem_openapi::Object;
use serde_json::{Map, Value};

use crate::types::list_query::Page;

/// One page of case-filing records
#[derive(Object, Debug)]
pub struct RecordListResponse {
    /// Records keyed by column name
    pub data: Vec<Value>,
    pub total: u64,
    pub page: u64,
    #[oai(rename = "totalPages")]
    pub total_pages: u64,
}

impl From<Page<Map<String, Value>>> for RecordListResponse {
    fn from(page: Page<Map<String, Value>>) -> Self {
        Self {
            total: page.total as u64,
            page: page.page as u64,
            total_pages: page.total_pages as u64,
            data: page.items.into_iter().map(Value::Object).collect(),
        }
    }
}

/// One page of audit log entries, newest first
#[derive(Object, Debug)]
pub struct LogListResponse {
    pub data: Vec<Value>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    #[oai(rename = "totalPages")]
    pub total_pages: u64,
}

impl From<Page<Map<String, Value>>> for LogListResponse {
    fn from(page: Page<Map<String, Value>>) -> Self {
        Self {
            total: page.total as u64,
            page: page.page as u64,
            limit: page.limit as u64,
            total_pages: page.total_pages as u64,
            data: page.items.into_iter().map(Value::Object).collect(),
        }
    }
}

#[derive(Object, Debug)]
pub struct SheetGidResponse {
    pub gid: i64,
}
