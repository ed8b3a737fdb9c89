use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Event;

/// A status message posted by the task processor.
///
/// Only `status` is interpreted here; everything else about the payload belongs
/// to the processor. Both fields are optional so that any message shape parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerMessage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl WorkerMessage {
    pub fn error(data: impl Into<Value>) -> Self {
        Self {
            status: Some("error".to_string()),
            data: data.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// Text to record for an error message. `None` when there is nothing to record.
    pub fn error_text(&self) -> Option<String> {
        if !self.is_error() {
            return None;
        }
        match &self.data {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerEventKind {
    Message,
}

impl Event for WorkerMessage {
    type Kind = WorkerEventKind;

    fn kind(&self) -> WorkerEventKind {
        WorkerEventKind::Message
    }
}
