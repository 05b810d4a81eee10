//! WebSocket connection handlers.
//!
//! Each upgraded socket goes through `AWAITING_JOIN → ACTIVE → CLOSED`:
//!
//! - `AWAITING_JOIN`: the first text frame must be a `join` message. Anything
//!   else closes the socket before the connection is ever registered.
//! - `ACTIVE`: a receiver task dispatches inbound frames while a pusher task
//!   drains the connection's outbound channel into the socket.
//! - `CLOSED`: when either task ends, the connection leaves the hub and the
//!   new presence lists are published.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{
            CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code,
            rejection::WebSocketUpgradeRejection,
        },
    },
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionHandle, OUTBOUND_QUEUE_CAPACITY},
    ui::state::AppState,
    usecase::{DispatchError, HandshakeError},
};

pub async fn websocket_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match ws {
        Ok(ws) => ws
            .on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
            .on_upgrade(move |socket| handle_socket(socket, state)),
        Err(rejection) => {
            tracing::warn!("Rejected WebSocket upgrade request: {}", rejection);
            rejection.into_response()
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this client to receive broadcasts
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);

    // AWAITING_JOIN
    let joined = match read_join_frame(&mut receiver).await {
        Ok(frame) => state.join_usecase.execute(&frame, tx).await,
        Err(e) => Err(e),
    };
    let connection = match joined {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!("Rejected handshake: {}", e);
            reject(&mut sender, &e).await;
            return;
        }
    };

    // ACTIVE
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(receiver, state.clone(), connection.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // CLOSED
    state.leave_usecase.execute(&connection).await;
}

/// Wait for the first data frame of a freshly upgraded socket.
async fn read_join_frame(receiver: &mut SplitStream<WebSocket>) -> Result<String, HandshakeError> {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => return Ok(text.as_str().to_owned()),
            Ok(Message::Binary(_)) => return Err(HandshakeError::NonTextFrame),
            Ok(Message::Close(_)) => return Err(HandshakeError::ConnectionClosed),
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("WebSocket error before join: {}", e);
                return Err(HandshakeError::ConnectionClosed);
            }
        }
    }
    Err(HandshakeError::ConnectionClosed)
}

/// Close a socket whose handshake failed. The socket is dropped by the caller.
async fn reject(sender: &mut SplitSink<WebSocket, Message>, error: &HandshakeError) {
    if matches!(error, HandshakeError::ConnectionClosed) {
        return;
    }

    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: Utf8Bytes::from_static("join required"),
    };
    if let Err(e) = sender.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

/// Spawns a task that forwards the connection's outbound channel to the WebSocket sender.
///
/// The task ends when a write fails or the channel closes. Its receiver is
/// dropped with it, so the next broadcast prunes the connection from the hub.
/// The channel also closes once a broadcast prunes a backlogged connection,
/// which ends this task after the queued frames are written.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that reads frames from this client and dispatches them.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection: ConnectionHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection.name, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    match state
                        .dispatch_message_usecase
                        .execute(&connection, text.as_str())
                        .await
                    {
                        Ok(outcome) => {
                            tracing::debug!("Frame from '{}': {:?}", connection.name, outcome);
                        }
                        Err(DispatchError::Decode(e)) => {
                            tracing::warn!(
                                "Ignoring malformed frame from '{}': {}",
                                connection.name,
                                e
                            );
                        }
                        Err(e) => {
                            tracing::error!(
                                "Failed to dispatch frame from '{}': {}",
                                connection.name,
                                e
                            );
                        }
                    }
                }
                Message::Binary(data) => {
                    tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", connection.name);
                    break;
                }
                _ => {}
            }
        }
    })
}
