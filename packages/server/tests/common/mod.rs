//! Test harness: runs the real router on an ephemeral port and drives it with
//! tokio-tungstenite clients.

#![allow(dead_code)]

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    infrastructure::hub::InMemoryHub,
    ui::Server,
    usecase::{
        Broadcaster, DispatchMessageUseCase, GetPresenceUseCase, JoinUseCase, LeaveUseCase,
        PresenceNotifier,
    },
};
use hiroba_shared::time::FixedClock;
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle, time::timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::protocol::{CloseFrame, Message},
};

pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// 2023-01-01 00:00:00 JST
pub const FIXED_NOW: i64 = 1672498800000;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct to manage the in-process server lifecycle
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_static_dir(None).await
    }

    pub async fn start_with_static_dir(static_dir: Option<PathBuf>) -> Self {
        let hub = Arc::new(InMemoryHub::new());
        let broadcaster = Broadcaster::new(hub.clone());
        let presence = Arc::new(PresenceNotifier::new(hub.clone()));
        let server = Server::new(
            Arc::new(JoinUseCase::new(
                hub.clone(),
                presence.clone(),
                Arc::new(FixedClock::new(FIXED_NOW)),
            )),
            Arc::new(DispatchMessageUseCase::new(
                hub.clone(),
                broadcaster,
                presence.clone(),
            )),
            Arc::new(LeaveUseCase::new(hub.clone(), presence)),
            Arc::new(GetPresenceUseCase::new(hub)),
        );
        let server = match static_dir {
            Some(dir) => server.with_static_dir(dir),
            None => server,
        };
        let app = server.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        TestServer { addr, handle }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Open a socket without sending anything
    pub async fn connect(&self) -> WsClient {
        let (client, _response) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        client
    }

    /// Open a socket, send `join` and wait until the server lists `name`
    pub async fn join(&self, name: &str) -> WsClient {
        let mut client = self.connect().await;
        send_json(&mut client, &json!({"type": "join", "name": name})).await;
        wait_for_users(&mut client, "connected_users", |users| {
            users.iter().any(|u| u == name)
        })
        .await;
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_json(client: &mut WsClient, value: &Value) {
    send_text(client, &value.to_string()).await;
}

pub async fn send_text(client: &mut WsClient, text: &str) {
    client
        .send(Message::text(text.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame parsed as JSON
pub async fn next_json(client: &mut WsClient) -> Value {
    loop {
        let msg = timeout(READ_TIMEOUT, client.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
            Message::Close(frame) => panic!("Connection closed unexpectedly: {:?}", frame),
            _ => continue,
        }
    }
}

/// Skip frames until one of the given `type` arrives
pub async fn next_of_type(client: &mut WsClient, kind: &str) -> Value {
    loop {
        let value = next_json(client).await;
        if value["type"] == kind {
            return value;
        }
    }
}

/// Skip presence frames of `kind` until `users` satisfies the predicate
pub async fn wait_for_users<F>(client: &mut WsClient, kind: &str, predicate: F) -> Vec<String>
where
    F: Fn(&[String]) -> bool,
{
    loop {
        let value = next_of_type(client, kind).await;
        let users = users_of(&value);
        assert_eq!(
            value["count"].as_u64(),
            Some(users.len() as u64),
            "count must match the user list"
        );
        if predicate(&users) {
            return users;
        }
    }
}

/// Read frames until none arrives for `quiet`; returns the last one of the given `type`
pub async fn last_of_type_when_quiet(
    client: &mut WsClient,
    kind: &str,
    quiet: Duration,
) -> Option<Value> {
    let mut last = None;
    while let Ok(next) = timeout(quiet, client.next()).await {
        match next {
            Some(Ok(Message::Text(text))) => {
                let value: Value = serde_json::from_str(text.as_str()).expect("Frame is not JSON");
                if value["type"] == kind {
                    last = Some(value);
                }
            }
            Some(Ok(Message::Close(frame))) => {
                panic!("Connection closed unexpectedly: {:?}", frame)
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => panic!("WebSocket error: {}", e),
            None => break,
        }
    }
    last
}

pub fn users_of(value: &Value) -> Vec<String> {
    value["users"]
        .as_array()
        .expect("users must be an array")
        .iter()
        .map(|u| u.as_str().expect("user must be a string").to_string())
        .collect()
}

/// Wait for the server to close the socket; returns the close frame if one was sent
pub async fn expect_closed(client: &mut WsClient) -> Option<CloseFrame> {
    loop {
        let next = timeout(READ_TIMEOUT, client.next())
            .await
            .expect("Timed out waiting for close");
        match next {
            Some(Ok(Message::Close(frame))) => return frame,
            Some(Ok(Message::Text(text))) => panic!("Unexpected frame before close: {}", text.as_str()),
            Some(Ok(_)) => continue,
            Some(Err(_)) | None => return None,
        }
    }
}
