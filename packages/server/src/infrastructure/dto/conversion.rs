//! Domain Model から DTO への変換

use hiroba_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{DisplayName, Participant, PresenceSnapshot};

use super::{
    http::{ParticipantDto, PresenceDto},
    websocket::WireMessage,
};

fn to_strings(names: Vec<DisplayName>) -> Vec<String> {
    names.into_iter().map(DisplayName::into_string).collect()
}

impl WireMessage {
    /// `connected_users` message from a names snapshot
    pub fn from_connected_names(names: Vec<DisplayName>) -> Self {
        Self::connected_users(to_strings(names))
    }

    /// `typing_users` message from a typing snapshot
    pub fn from_typing_names(names: Vec<DisplayName>) -> Self {
        Self::typing_users(to_strings(names))
    }
}

impl From<Participant> for ParticipantDto {
    fn from(participant: Participant) -> Self {
        Self {
            name: participant.name.into_string(),
            connected_at: timestamp_to_jst_rfc3339(participant.connected_at.value()),
        }
    }
}

impl From<PresenceSnapshot> for PresenceDto {
    fn from(snapshot: PresenceSnapshot) -> Self {
        Self {
            count: snapshot.participants.len(),
            participants: snapshot
                .participants
                .into_iter()
                .map(ParticipantDto::from)
                .collect(),
            typing: to_strings(snapshot.typing),
        }
    }
}
