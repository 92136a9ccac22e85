// Tabular store seam: range-addressed rows in named tables
pub mod memory;
pub mod sheets;

use async_trait::async_trait;
use std::fmt;

use crate::errors::internal::StoreError;

pub use memory::MemoryTabularStore;
pub use sheets::SheetsTabularStore;

/// One row of cells, in column order
pub type Row = Vec<String>;

/// Contiguous span of columns, zero-based and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub first: usize,
    pub last: usize,
}

impl ColumnRange {
    /// Columns `A` through the `width`-th column
    pub fn leading(width: usize) -> Self {
        Self {
            first: 0,
            last: width.saturating_sub(1),
        }
    }

    pub fn width(&self) -> usize {
        self.last - self.first + 1
    }

    /// Whole-column notation, e.g. `A:G`
    pub fn a1(&self) -> String {
        format!("{}:{}", column_letters(self.first), column_letters(self.last))
    }

    /// Single-row notation for a zero-based row position, e.g. `A5:G5`
    pub fn a1_row(&self, position: usize) -> String {
        let row_number = position + 1;
        format!(
            "{}{}:{}{}",
            column_letters(self.first),
            row_number,
            column_letters(self.last),
            row_number
        )
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}

/// Spreadsheet column name for a zero-based index (0 → A, 25 → Z, 26 → AA)
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Remote table service addressed by table name and column range
///
/// Row positions are zero-based indexes into what `fetch_range` returns,
/// header row included. No call is transactional.
#[async_trait]
pub trait TabularStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// All rows of the table restricted to `columns`; trailing empty cells may be omitted
    async fn fetch_range(&self, table: &str, columns: ColumnRange) -> Result<Vec<Row>, StoreError>;

    async fn append_row(&self, table: &str, columns: ColumnRange, row: Row) -> Result<(), StoreError>;

    /// Overwrite the cells of one row inside `columns`
    async fn update_row(
        &self,
        table: &str,
        position: usize,
        columns: ColumnRange,
        row: Row,
    ) -> Result<(), StoreError>;

    /// Remove `count` rows starting at `start`, shifting later rows up
    async fn delete_rows(&self, table: &str, start: usize, count: usize) -> Result<(), StoreError>;

    /// Blank every cell in `columns`, header included
    async fn clear_range(&self, table: &str, columns: ColumnRange) -> Result<(), StoreError>;

    /// Internal numeric identifier of a table (the sheet gid)
    async fn table_id(&self, table: &str) -> Result<i64, StoreError>;
}
