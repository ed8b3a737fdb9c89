use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Error,
}

/// A single recorded worker error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    /// Informational id, wraps around; not unique over the process lifetime
    #[serde(rename = "messageId")]
    pub id: u32,
    /// Unix timestamp in milliseconds on the wire
    #[serde(rename = "date", with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
}
