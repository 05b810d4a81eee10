//! Connection entity and presence snapshots.

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{ConnectionId, DisplayName, MessagePushError, Timestamp};

/// Frames that may wait in one connection's outbound queue.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Outbound channel of one connection.
///
/// The receiving half is drained into the WebSocket sink by that connection's
/// pusher task. The queue is bounded: a client that stays connected but stops
/// reading fills it, and the next push fails like a broken transport does.
pub type PusherChannel = mpsc::Sender<String>;

/// One admitted client: identity, display name and outbound channel.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub name: DisplayName,
    pub connected_at: Timestamp,
    channel: PusherChannel,
}

impl Connection {
    /// Create a connection with a freshly generated identity
    pub fn new(name: DisplayName, connected_at: Timestamp, channel: PusherChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            name,
            connected_at,
            channel,
        }
    }

    /// Lightweight copy of the identity used by the per-connection read loop
    pub fn handle(&self) -> ConnectionHandle {
        ConnectionHandle {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Queue one text frame for this client.
    ///
    /// Never blocks. Fails when the pusher task has ended or the queue is full.
    pub fn push(&self, content: &str) -> Result<(), MessagePushError> {
        self.channel
            .try_send(content.to_string())
            .map_err(|e| match e {
                TrySendError::Full(_) => MessagePushError::Backlogged(self.id),
                TrySendError::Closed(_) => MessagePushError::ChannelClosed(self.id),
            })
    }
}

/// What the read loop of a connection knows about itself after admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub name: DisplayName,
}

/// A live connection as shown in presence views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: DisplayName,
    pub connected_at: Timestamp,
}

/// Live participants and typing names taken under one lock acquisition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub participants: Vec<Participant>,
    pub typing: Vec<DisplayName>,
}
