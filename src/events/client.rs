use super::Event;

/// Events reported by a connected editor channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// An editor reported the stylesheet files it currently has open.
    EditorFiles { id: String, files: Vec<String> },
    /// A single editor went away; the channel itself stays open.
    EditorDisconnect { id: String },
    /// The whole channel closed, taking every editor behind it along.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientEventKind {
    EditorFiles,
    EditorDisconnect,
    Close,
}

impl ClientEventKind {
    pub const ALL: [ClientEventKind; 3] = [
        ClientEventKind::EditorFiles,
        ClientEventKind::EditorDisconnect,
        ClientEventKind::Close,
    ];
}

impl Event for ClientEvent {
    type Kind = ClientEventKind;

    fn kind(&self) -> ClientEventKind {
        match self {
            ClientEvent::EditorFiles { .. } => ClientEventKind::EditorFiles,
            ClientEvent::EditorDisconnect { .. } => ClientEventKind::EditorDisconnect,
            ClientEvent::Close => ClientEventKind::Close,
        }
    }
}
