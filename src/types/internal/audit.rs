use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Outcome recorded in the access log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Success,
    Failure,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Success => "berhasil",
            AccessStatus::Failure => "gagal",
        }
    }
}

/// One login attempt
#[derive(Debug, Clone, PartialEq)]
pub struct AccessEntry {
    pub id: String,
    pub user: String,
    pub ip: String,
    pub browser: String,
    pub status: AccessStatus,
    pub recorded_at: String,
}

/// One successful mutation
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: String,
    pub user: String,
    pub ip: String,
    pub browser: String,
    /// `"<VERB> <SUBSYSTEM>"`, e.g. `POST SALINAN PUTUSAN`
    pub action: String,
    pub recorded_at: String,
    pub target_id: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl AccessEntry {
    pub fn new(user: impl Into<String>, ip: impl Into<String>, browser: impl Into<String>, status: AccessStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user: user.into(),
            ip: ip.into(),
            browser: browser.into(),
            status,
            recorded_at: now(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user.clone(),
            self.ip.clone(),
            self.browser.clone(),
            self.status.as_str().to_string(),
            self.recorded_at.clone(),
        ]
    }
}

impl ActivityEntry {
    pub fn new(
        user: impl Into<String>,
        ip: impl Into<String>,
        browser: impl Into<String>,
        action: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user: user.into(),
            ip: ip.into(),
            browser: browser.into(),
            action: action.into(),
            recorded_at: now(),
            target_id: target_id.into(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user.clone(),
            self.ip.clone(),
            self.browser.clone(),
            self.action.clone(),
            self.recorded_at.clone(),
            self.target_id.clone(),
        ]
    }
}

/// Audit log tables and their stored layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Access,
    Activity,
}

pub const ACCESS_LOG_TABLE: &str = "log_access";
pub const ACTIVITY_LOG_TABLE: &str = "log_activity";
pub const ACCESS_LOG_COLUMNS: &[&str] = &["id", "user", "ip", "browser", "status", "akses_record"];
pub const ACTIVITY_LOG_COLUMNS: &[&str] =
    &["id", "user", "ip", "browser", "aksi", "akses_record", "target_id"];
/// Column holding the entry timestamp in both layouts
pub const TIMESTAMP_COLUMN: usize = 5;

impl LogKind {
    pub fn table(&self) -> &'static str {
        match self {
            LogKind::Access => ACCESS_LOG_TABLE,
            LogKind::Activity => ACTIVITY_LOG_TABLE,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            LogKind::Access => ACCESS_LOG_COLUMNS,
            LogKind::Activity => ACTIVITY_LOG_COLUMNS,
        }
    }
}

/// Kind of committed write, labelled by its HTTP verb in activity rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

/// Subsystem label for user-account mutations
pub const USERS_SUBSYSTEM: &str = "PENGGUNA";

impl Mutation {
    pub fn verb(&self) -> &'static str {
        match self {
            Mutation::Create => "POST",
            Mutation::Update => "PUT",
            Mutation::Delete => "DELETE",
        }
    }

    /// `"<VERB> <SUBSYSTEM>"`, e.g. `DELETE WARMEKING`
    pub fn action(&self, subsystem: &str) -> String {
        format!("{} {}", self.verb(), subsystem)
    }
}
