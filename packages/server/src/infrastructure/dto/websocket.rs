//! WebSocket wire messages.
//!
//! Every frame is one JSON object tagged by its `type` field. Absent optional
//! fields are omitted from the wire form instead of being sent as `null`.
//!
//! ```text
//! {"type":"join","name":"alice"}
//! {"type":"chat","name":"alice","message":"hi","id":"1700000000000"}
//! {"type":"reaction","name":"bob","messageId":"1700000000000","reaction":"👍"}
//! {"type":"typing"}
//! {"type":"connected_users","users":["alice","bob"],"count":2}
//! ```

use serde::{Deserialize, Serialize};

/// One application message.
///
/// A known `type` whose fields have the wrong JSON shape fails to decode.
/// An unknown `type` decodes to [`WireMessage::Unknown`] so newer clients can
/// send kinds this server does not handle yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Handshake (client → server only)
    Join(JoinPayload),
    Chat(ChatPayload),
    Reaction(ReactionPayload),
    /// The sender started typing; the name is taken from the connection
    Typing,
    StopTyping,
    /// Server → client only
    ConnectedUsers(UserListPayload),
    /// Server → client only
    TypingUsers(UserListPayload),
    #[serde(other)]
    Unknown,
}

impl WireMessage {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn connected_users(users: Vec<String>) -> Self {
        Self::ConnectedUsers(UserListPayload::new(users))
    }

    pub fn typing_users(users: Vec<String>) -> Self {
        Self::TypingUsers(UserListPayload::new(users))
    }

    /// Wire name of the message kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::Chat(_) => "chat",
            Self::Reaction(_) => "reaction",
            Self::Typing => "typing",
            Self::StopTyping => "stop_typing",
            Self::ConnectedUsers(_) => "connected_users",
            Self::TypingUsers(_) => "typing_users",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPayload {
    pub name: String,
}

/// Chat message, relayed exactly as the sender supplied it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Reaction to a chat message identified by `messageId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
}

/// Full presence list; `users` and `count` are always sent, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListPayload {
    pub users: Vec<String>,
    pub count: usize,
}

impl UserListPayload {
    pub fn new(users: Vec<String>) -> Self {
        let count = users.len();
        Self { users, count }
    }
}
