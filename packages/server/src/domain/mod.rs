//! Domain layer: connection identity, the hub abstraction and its errors.
//!
//! Infrastructure 層はここで定義された trait を実装する（依存性の逆転）。

mod connection;
mod error;
mod hub;
mod value_object;

pub use connection::{
    Connection, ConnectionHandle, OUTBOUND_QUEUE_CAPACITY, Participant, PresenceSnapshot,
    PusherChannel,
};
pub use error::{MessagePushError, PresenceRenderError, ValueObjectError};
pub use hub::{BroadcastReport, ConnectionHub, PresenceList, PresenceRenderer};
pub use value_object::{ConnectionId, DisplayName, Timestamp};

#[cfg(test)]
pub use hub::MockConnectionHub;
