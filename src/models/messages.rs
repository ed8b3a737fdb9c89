use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::ClientEvent;
use crate::models::{LogEntry, PublishedState};

#[derive(Serialize, Deserialize, Debug)]
pub struct EditorFilesPayload {
    pub id: String,
    /// Expected to be a list of paths; anything else reads as no files
    #[serde(default)]
    pub files: Value,
}

impl EditorFilesPayload {
    /// String entries of `files`, skipping anything that is not a path.
    pub fn file_list(self) -> Vec<String> {
        match self.files {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(path) => Some(path),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct EditorDisconnectPayload {
    pub id: String,
}

/// Frames received from an editor channel
#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "name", content = "data")]
pub enum ClientFrame {
    #[serde(rename = "editor-files")]
    EditorFiles(EditorFilesPayload),
    #[serde(rename = "editor-disconnect")]
    EditorDisconnect(EditorDisconnectPayload),
}

impl From<ClientFrame> for ClientEvent {
    fn from(frame: ClientFrame) -> Self {
        match frame {
            ClientFrame::EditorFiles(payload) => ClientEvent::EditorFiles {
                id: payload.id.clone(),
                files: payload.file_list(),
            },
            ClientFrame::EditorDisconnect(payload) => ClientEvent::EditorDisconnect { id: payload.id },
        }
    }
}

/// Requests other extension components send over the bus
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "name")]
pub enum BusRequest {
    #[serde(rename = "get-log")]
    GetLog,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "name", content = "data")]
pub enum BusResponse {
    #[serde(rename = "log")]
    Log(Vec<LogEntry>),
}

/// Notifications broadcast to every bus listener
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "name", content = "data")]
pub enum BusMessage {
    #[serde(rename = "log-updated")]
    LogUpdated(Vec<LogEntry>),
    #[serde(rename = "editor-files")]
    EditorFiles(PublishedState),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn editor_files_frame_without_files_becomes_empty_list() {
        let frame: ClientFrame =
            serde_json::from_value(json!({"name": "editor-files", "data": {"id": "A"}})).unwrap();
        assert_eq!(
            ClientEvent::from(frame),
            ClientEvent::EditorFiles { id: "A".to_string(), files: vec![] }
        );

        let frame: ClientFrame =
            serde_json::from_value(json!({"name": "editor-files", "data": {"id": "A", "files": null}})).unwrap();
        assert_eq!(
            ClientEvent::from(frame),
            ClientEvent::EditorFiles { id: "A".to_string(), files: vec![] }
        );
    }

    #[test]
    fn non_string_file_entries_are_dropped() {
        let frame: ClientFrame = serde_json::from_value(json!({
            "name": "editor-files",
            "data": {"id": "A", "files": ["a.css", null, 3, "b.css"]}
        }))
        .unwrap();
        assert_eq!(
            ClientEvent::from(frame),
            ClientEvent::EditorFiles {
                id: "A".to_string(),
                files: vec!["a.css".to_string(), "b.css".to_string()],
            }
        );

        let frame: ClientFrame =
            serde_json::from_value(json!({"name": "editor-files", "data": {"id": "A", "files": "a.css"}})).unwrap();
        assert_eq!(
            ClientEvent::from(frame),
            ClientEvent::EditorFiles { id: "A".to_string(), files: vec![] }
        );
    }

    #[test]
    fn unknown_frame_name_is_rejected() {
        let res = serde_json::from_value::<ClientFrame>(json!({"name": "patch", "data": {}}));
        assert!(res.is_err());
    }

    #[test]
    fn get_log_request_parses_from_name_only() {
        let req: BusRequest = serde_json::from_str(r#"{"name":"get-log"}"#).unwrap();
        assert_eq!(req, BusRequest::GetLog);
    }

    #[test]
    fn log_updated_is_tagged_by_name() {
        let value = serde_json::to_value(BusMessage::LogUpdated(vec![])).unwrap();
        assert_eq!(value, json!({"name": "log-updated", "data": []}));
    }
}
