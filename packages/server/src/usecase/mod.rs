//! UseCase layer: handshake, message routing, departure and presence.

mod broadcast;
mod dispatch_message;
mod error;
mod get_presence;
mod join;
mod leave;
mod presence;

pub use broadcast::Broadcaster;
pub use dispatch_message::{DispatchMessageUseCase, DispatchOutcome};
pub use error::{BroadcastError, DispatchError, HandshakeError};
pub use get_presence::GetPresenceUseCase;
pub use join::JoinUseCase;
pub use leave::LeaveUseCase;
pub use presence::PresenceNotifier;
