//! Real-time message relay built on Axum and WebSocket.
//!
//! Clients join with a display name, then every chat message, reaction and
//! presence update is fanned out to all connected clients through a single
//! in-memory connection hub.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
