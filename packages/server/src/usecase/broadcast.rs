//! UseCase: ブロードキャスト
//!
//! メッセージを一度だけシリアライズし、ハブに登録された全ての接続に送信する。
//! 送信失敗による接続の削除はハブが同じロック区間内で行う。
//! presence の再通知は呼び出し側の責務。

use std::sync::Arc;

use crate::{
    domain::{BroadcastReport, ConnectionHub},
    infrastructure::dto::websocket::WireMessage,
};

use super::error::BroadcastError;

/// ブロードキャストのユースケース
#[derive(Clone)]
pub struct Broadcaster {
    hub: Arc<dyn ConnectionHub>,
}

impl Broadcaster {
    pub fn new(hub: Arc<dyn ConnectionHub>) -> Self {
        Self { hub }
    }

    /// メッセージを全ての接続に送信
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 配信数と、送信失敗で削除された接続
    /// * `Err(BroadcastError)` - シリアライズ失敗（何も送信されない）
    pub async fn broadcast(&self, message: &WireMessage) -> Result<BroadcastReport, BroadcastError> {
        let payload = message
            .encode()
            .map_err(|e| BroadcastError::Serialize(e.to_string()))?;

        let report = self.hub.broadcast(&payload).await;
        if !report.pruned.is_empty() {
            tracing::warn!(
                "Broadcast of '{}' pruned {} broken connection(s)",
                message.kind(),
                report.pruned.len()
            );
        }
        Ok(report)
    }
}
