//! InMemory ConnectionHub 実装
//!
//! live 集合（`HashMap<ConnectionId, Connection>`）と typing 集合（`HashSet<DisplayName>`）を
//! 1 つの `tokio::sync::Mutex` でまとめて保護する。
//!
//! ## 設計ノート
//!
//! ブロードキャストはロックを保持したまま各接続の `PusherChannel` に送信する。
//! チャンネル送信はブロックしないため、遅いクライアントが他のクライアントへの配信を止めることはない。
//! 送信に失敗した接続は同じロック区間内で削除する。
//! presence 一覧も取得から送信までを同じロック区間で行う。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastReport, Connection, ConnectionHub, ConnectionId, DisplayName, Participant,
    PresenceList, PresenceRenderError, PresenceRenderer, PresenceSnapshot,
};

#[derive(Debug, Default)]
struct HubState {
    connections: HashMap<ConnectionId, Connection>,
    typing: HashSet<DisplayName>,
}

impl HubState {
    fn remove(&mut self, id: &ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(id)?;
        self.typing.remove(&connection.name);
        Some(connection)
    }

    fn sorted_names(&self) -> Vec<DisplayName> {
        let mut names: Vec<DisplayName> = self
            .connections
            .values()
            .map(|connection| connection.name.clone())
            .collect();
        names.sort();
        names
    }

    fn sorted_typing(&self) -> Vec<DisplayName> {
        let mut typing: Vec<DisplayName> = self.typing.iter().cloned().collect();
        typing.sort();
        typing
    }

    /// 全ての接続に送信し、送信に失敗した接続を削除する
    fn push_all(&mut self, content: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for (id, connection) in self.connections.iter() {
            match connection.push(content) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Dropping connection '{}' ({}): {}", id, connection.name, e);
                    report.pruned.push(*id);
                }
            }
        }

        // 送信に失敗した接続は切断扱い
        for id in &report.pruned {
            self.remove(id);
        }

        tracing::debug!(
            "Broadcasted to {} connection(s), pruned {}",
            report.delivered,
            report.pruned.len()
        );
        report
    }
}

/// インメモリ ConnectionHub 実装
#[derive(Debug, Default)]
pub struct InMemoryHub {
    state: Mutex<HubState>,
}

impl InMemoryHub {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionHub for InMemoryHub {
    async fn add(&self, connection: Connection) {
        let mut state = self.state.lock().await;
        tracing::debug!(
            "Connection '{}' ({}) added to hub",
            connection.id,
            connection.name
        );
        state.connections.insert(connection.id, connection);
    }

    async fn remove(&self, id: &ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        match state.remove(id) {
            Some(connection) => {
                tracing::debug!(
                    "Connection '{}' ({}) removed from hub",
                    id,
                    connection.name
                );
                true
            }
            None => false,
        }
    }

    async fn set_typing(&self, id: &ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        let Some(name) = state.connections.get(id).map(|c| c.name.clone()) else {
            return false;
        };
        state.typing.insert(name)
    }

    async fn clear_typing(&self, id: &ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        let Some(name) = state.connections.get(id).map(|c| c.name.clone()) else {
            return false;
        };
        state.typing.remove(&name)
    }

    async fn snapshot_presence(&self) -> PresenceSnapshot {
        let state = self.state.lock().await;
        let mut participants: Vec<Participant> = state
            .connections
            .values()
            .map(|connection| Participant {
                name: connection.name.clone(),
                connected_at: connection.connected_at,
            })
            .collect();
        participants.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.connected_at.cmp(&b.connected_at))
        });

        PresenceSnapshot {
            participants,
            typing: state.sorted_typing(),
        }
    }

    async fn count(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    async fn broadcast(&self, content: &str) -> BroadcastReport {
        self.state.lock().await.push_all(content)
    }

    async fn broadcast_presence(
        &self,
        list: PresenceList,
        render: PresenceRenderer,
    ) -> Result<BroadcastReport, PresenceRenderError> {
        let mut state = self.state.lock().await;
        let names = match list {
            PresenceList::Connected => state.sorted_names(),
            PresenceList::Typing => state.sorted_typing(),
        };
        let content = render(names)?;
        Ok(state.push_all(&content))
    }
}
