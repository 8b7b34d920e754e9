//! Shared REST and realtime DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! Field names follow the backend JSON (`_id`, camelCase) through serde
//! attributes so pages can work with idiomatic snake_case Rust fields.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Account tier as reported by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Pro,
    #[default]
    Free,
}

impl Role {
    /// Options in the order the edit form lists them.
    pub const ALL: [Role; 3] = [Role::Free, Role::Pro, Role::Admin];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Pro => "pro",
            Self::Free => "free",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "pro" => Some(Self::Pro),
            "free" => Some(Self::Free),
            _ => None,
        }
    }
}

/// Identity cached next to the bearer token in persistent storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub role: Role,
}

/// `POST /auth/login` response body; every field is optional on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<LoginUser>,
    /// Backend error text on non-2xx responses.
    #[serde(default)]
    pub message: Option<String>,
}

/// User block of the login response. Extra fields are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Severity of a backend log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    #[serde(other)]
    Unknown,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Unknown => "unknown",
        }
    }

    /// Badge modifier class for the log table.
    #[must_use]
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Fatal | Self::Error => "level-badge level-badge--error",
            Self::Warn => "level-badge level-badge--warn",
            Self::Info => "level-badge level-badge--info",
            Self::Debug | Self::Trace | Self::Unknown => "level-badge level-badge--muted",
        }
    }
}

/// One row from `GET /admin/logs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub error_stack: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl LogEntry {
    /// `METHOD url (status) [ip]`, skipping absent parts.
    #[must_use]
    pub fn request_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(method) = &self.method {
            parts.push(method.clone());
        }
        if let Some(url) = &self.url {
            parts.push(url.clone());
        }
        if let Some(status) = self.status {
            parts.push(format!("({status})"));
        }
        if let Some(ip) = &self.ip_address {
            parts.push(format!("[{ip}]"));
        }
        parts.join(" ")
    }
}

/// Pagination block of the logs response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_logs: u64,
    pub limit: u32,
}

/// `GET /admin/logs` response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogPage {
    pub data: Vec<LogEntry>,
    pub pagination: Pagination,
}

/// Row of `GET /admin/users`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub created_at: String,
}

impl UserData {
    /// Full name, or a placeholder when neither part is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        if first.is_empty() && last.is_empty() {
            return "(No name provided)".to_owned();
        }
        format!("{first} {last}").trim().to_owned()
    }
}

/// `GET`/`PUT /admin/users/:id` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEditData {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    #[serde(default)]
    pub stripe_subscription_id: Option<String>,
    #[serde(default)]
    pub stripe_subscription_status: Option<String>,
}

/// Editable subset sent with `PUT /admin/users/:id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdatePayload {
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl From<&UserEditData> for UserUpdatePayload {
    fn from(user: &UserEditData) -> Self {
        Self {
            role: user.role,
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
        }
    }
}

/// Who may watch a video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Free,
    Pro,
    Admin,
}

impl AccessLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Admin => "admin",
        }
    }
}

/// Card in the `GET /videos` catalogue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    pub access_level: AccessLevel,
    pub created_at: String,
}

/// `GET /videos/:id` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    pub access_level: String,
    /// Opaque playback identifier handed to the external player.
    #[serde(default)]
    pub mux_playback_id: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub created_at: String,
}

/// Rounded whole minutes, e.g. `"3 min"`; empty when unknown or zero.
#[must_use]
pub fn duration_label(seconds: Option<f64>) -> String {
    match seconds {
        Some(secs) if secs > 0.0 => format!("{} min", (secs / 60.0).round()),
        _ => String::new(),
    }
}

/// Server → client `receiveMessage` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub sender_id: String,
    pub message: String,
    /// ISO-8601 send time.
    pub timestamp: String,
}

/// Client → server `sendMessage` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub recipient_id: String,
    pub message: String,
}

/// Server → client `errorMessage` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorMessage {
    pub error: String,
}
