//! UseCase: 受信メッセージの振り分け
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DispatchMessageUseCase::execute() メソッド
//! - type ごとの振り分け（chat / reaction / typing / stop_typing / 未知の type）
//!
//! ### なぜこのテストが必要か
//! - chat / reaction が送信者を含む全員にそのまま届くことを保証する
//! - typing 状態が接続の名前で管理されることを確認する
//! - 不正なフレームで接続が切られないことを確認する

use std::sync::Arc;

use crate::{
    domain::{BroadcastReport, ConnectionHandle, ConnectionHub},
    infrastructure::dto::websocket::WireMessage,
};

use super::{broadcast::Broadcaster, error::DispatchError, presence::PresenceNotifier};

/// 1 フレームを処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// chat / reaction をそのままブロードキャストした
    Relayed(BroadcastReport),
    /// typing 集合を更新し typing_users を通知した
    TypingUpdated { changed: bool },
    /// 処理対象外の type（join の再送、サーバー専用の type、未知の type）
    Ignored(&'static str),
}

/// 受信メッセージ振り分けのユースケース
pub struct DispatchMessageUseCase {
    hub: Arc<dyn ConnectionHub>,
    broadcaster: Broadcaster,
    presence: Arc<PresenceNotifier>,
}

impl DispatchMessageUseCase {
    pub fn new(
        hub: Arc<dyn ConnectionHub>,
        broadcaster: Broadcaster,
        presence: Arc<PresenceNotifier>,
    ) -> Self {
        Self {
            hub,
            broadcaster,
            presence,
        }
    }

    /// join 済みの接続から届いた 1 フレームを処理
    ///
    /// # Arguments
    ///
    /// * `sender` - フレームを送ってきた接続
    /// * `frame` - テキストフレームの内容
    ///
    /// # Returns
    ///
    /// * `Ok(DispatchOutcome)` - 処理結果
    /// * `Err(DispatchError::Decode)` - 解釈できないフレーム（呼び出し側は無視して続行する）
    pub async fn execute(
        &self,
        sender: &ConnectionHandle,
        frame: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let message =
            WireMessage::decode(frame).map_err(|e| DispatchError::Decode(e.to_string()))?;

        match message {
            WireMessage::Chat(_) | WireMessage::Reaction(_) => {
                tracing::debug!("Relaying '{}' from '{}'", message.kind(), sender.name);
                let report = self.broadcaster.broadcast(&message).await?;
                Ok(DispatchOutcome::Relayed(report))
            }
            WireMessage::Typing => {
                let changed = self.hub.set_typing(&sender.id).await;
                self.presence.publish_typing_users().await?;
                Ok(DispatchOutcome::TypingUpdated { changed })
            }
            WireMessage::StopTyping => {
                let changed = self.hub.clear_typing(&sender.id).await;
                self.presence.publish_typing_users().await?;
                Ok(DispatchOutcome::TypingUpdated { changed })
            }
            other => {
                tracing::debug!("Ignoring '{}' from '{}'", other.kind(), sender.name);
                Ok(DispatchOutcome::Ignored(other.kind()))
            }
        }
    }
}
