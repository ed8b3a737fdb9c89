use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Files open across all connected editors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublishedState {
    /// Union of every editor's files, first-seen order, no duplicates
    pub files: Vec<String>,
    /// Whether at least one editor is connected
    pub active: bool,
}
