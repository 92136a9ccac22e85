use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::errors::internal::RecordError;

/// Default page size for case-filing and user lists
pub const DEFAULT_LIMIT: usize = 10;
/// Default page size for audit log lists
pub const DEFAULT_LOG_LIMIT: usize = 15;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a stored or queried date, with or without a time part
///
/// RFC 3339 values are compared in UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Inclusive date window; the end bound covers its whole day
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    start: Option<NaiveDateTime>,
    end_exclusive: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, RecordError> {
        let start = match non_empty(start) {
            Some(raw) => Some(
                parse_timestamp(raw)
                    .ok_or_else(|| RecordError::validation(format!("Invalid startDate: {}", raw)))?,
            ),
            None => None,
        };
        let end_exclusive = match non_empty(end) {
            Some(raw) => {
                let end = parse_timestamp(raw)
                    .ok_or_else(|| RecordError::validation(format!("Invalid endDate: {}", raw)))?;
                end.date()
                    .succ_opt()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .or_else(|| Some(end + Duration::days(1)))
            }
            None => None,
        };
        Ok(Self {
            start,
            end_exclusive,
        })
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end_exclusive.is_some()
    }

    /// Whether a stored date cell falls inside the window
    ///
    /// With no bounds everything matches. With any bound, unparsable cells never match.
    pub fn contains(&self, cell: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(value) = parse_timestamp(cell) else {
            return false;
        };
        if let Some(start) = self.start {
            if value < start {
                return false;
            }
        }
        if let Some(end) = self.end_exclusive {
            if value >= end {
                return false;
            }
        }
        true
    }
}

/// Validated list parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub range: DateRange,
    pub search: Option<String>,
    pub page: usize,
    pub limit: usize,
}

impl ListQuery {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            range: DateRange::default(),
            search: None,
            page,
            limit,
        }
    }

    pub fn from_params(
        start_date: Option<&str>,
        end_date: Option<&str>,
        search: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: usize,
    ) -> Result<Self, RecordError> {
        let page = match page {
            None => 1,
            Some(p) if p >= 1 => p as usize,
            Some(_) => return Err(RecordError::validation("page must be at least 1")),
        };
        let limit = match limit {
            None => default_limit,
            Some(l) if l >= 1 => l as usize,
            Some(_) => return Err(RecordError::validation("limit must be at least 1")),
        };

        Ok(Self {
            range: DateRange::parse(start_date, end_date)?,
            search: non_empty(search).map(str::to_lowercase),
            page,
            limit,
        })
    }

    /// Case-insensitive substring match against any of `fields`
    pub fn matches_search<'a>(&self, mut fields: impl Iterator<Item = &'a str>) -> bool {
        match &self.search {
            None => true,
            Some(needle) => fields.any(|f| f.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// One page of results plus the totals needed to render a pager
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// Slice `items` for the requested page; `total_pages` is never below 1
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(limit).max(1);
    let start = (page - 1).saturating_mul(limit);
    let items = items.into_iter().skip(start).take(limit).collect();

    Page {
        items,
        total,
        page,
        limit,
        total_pages,
    }
}
