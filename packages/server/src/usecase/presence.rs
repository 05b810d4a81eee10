//! UseCase: presence 通知
//!
//! 接続中のユーザー・入力中のユーザーの一覧を、毎回全体としてブロードキャストする。
//! 差分は送らないため、取りこぼしたクライアントも次の通知で最新状態に戻る。
//! 一覧の取得と送信はハブの同じロック区間で行われ、古い一覧が後から届くことはない。

use std::sync::Arc;

use crate::{
    domain::{
        BroadcastReport, ConnectionHub, DisplayName, PresenceList, PresenceRenderError,
        PresenceRenderer,
    },
    infrastructure::dto::websocket::WireMessage,
};

use super::error::BroadcastError;

fn render_connected_users(names: Vec<DisplayName>) -> Result<String, PresenceRenderError> {
    WireMessage::from_connected_names(names)
        .encode()
        .map_err(|e| PresenceRenderError(e.to_string()))
}

fn render_typing_users(names: Vec<DisplayName>) -> Result<String, PresenceRenderError> {
    WireMessage::from_typing_names(names)
        .encode()
        .map_err(|e| PresenceRenderError(e.to_string()))
}

/// presence 通知のユースケース
pub struct PresenceNotifier {
    hub: Arc<dyn ConnectionHub>,
}

impl PresenceNotifier {
    pub fn new(hub: Arc<dyn ConnectionHub>) -> Self {
        Self { hub }
    }

    /// `connected_users` を全員に送信
    pub async fn publish_connected_users(&self) -> Result<BroadcastReport, BroadcastError> {
        self.publish(PresenceList::Connected).await
    }

    /// `typing_users` を全員に送信
    pub async fn publish_typing_users(&self) -> Result<BroadcastReport, BroadcastError> {
        self.publish(PresenceList::Typing).await
    }

    /// Publish both lists, logging instead of failing.
    pub async fn publish_all(&self) {
        if let Err(e) = self.publish_connected_users().await {
            tracing::error!("Failed to publish connected users: {}", e);
        }
        if let Err(e) = self.publish_typing_users().await {
            tracing::error!("Failed to publish typing users: {}", e);
        }
    }

    async fn publish(&self, list: PresenceList) -> Result<BroadcastReport, BroadcastError> {
        let render: PresenceRenderer = match list {
            PresenceList::Connected => render_connected_users,
            PresenceList::Typing => render_typing_users,
        };
        let report = self
            .hub
            .broadcast_presence(list, render)
            .await
            .map_err(|e| BroadcastError::Serialize(e.0))?;

        tracing::debug!("Published {:?} list to {} connection(s)", list, report.delivered);
        if !report.pruned.is_empty() {
            tracing::warn!(
                "Presence broadcast pruned {} broken connection(s)",
                report.pruned.len()
            );
        }
        Ok(report)
    }
}
