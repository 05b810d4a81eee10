//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/presence`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceDto {
    pub count: usize,
    pub participants: Vec<ParticipantDto>,
    pub typing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub name: String,
    /// RFC 3339 in JST; omitted if the timestamp cannot be rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<String>,
}
