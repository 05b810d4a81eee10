//! UseCase: 参加（ハンドシェイク）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinUseCase::execute() メソッド
//! - 最初のフレームの検証（join 以外・名前なし・不正な JSON の拒否）
//!
//! ### なぜこのテストが必要か
//! - ハンドシェイクに失敗した接続がハブに登録されないことを保証する
//! - 参加成功時に connected_users が通知されることを確認する

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::{
    domain::{Connection, ConnectionHandle, ConnectionHub, DisplayName, PusherChannel, Timestamp},
    infrastructure::dto::websocket::WireMessage,
};

use super::{error::HandshakeError, presence::PresenceNotifier};

/// 最初のフレームから表示名を取り出す
pub(crate) fn parse_join(frame: &str) -> Result<DisplayName, HandshakeError> {
    match WireMessage::decode(frame) {
        Ok(WireMessage::Join(join)) => Ok(DisplayName::new(join.name)?),
        Ok(other) => Err(HandshakeError::UnexpectedType(other.kind())),
        Err(e) => Err(HandshakeError::Decode(e.to_string())),
    }
}

/// 参加のユースケース
pub struct JoinUseCase {
    hub: Arc<dyn ConnectionHub>,
    presence: Arc<PresenceNotifier>,
    clock: Arc<dyn Clock>,
}

impl JoinUseCase {
    pub fn new(
        hub: Arc<dyn ConnectionHub>,
        presence: Arc<PresenceNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            hub,
            presence,
            clock,
        }
    }

    /// ハンドシェイクを実行し、成功すれば接続をハブに登録する
    ///
    /// # Arguments
    ///
    /// * `frame` - 接続後最初のテキストフレーム
    /// * `channel` - この接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionHandle)` - 登録された接続
    /// * `Err(HandshakeError)` - 拒否（ハブには登録されない）
    pub async fn execute(
        &self,
        frame: &str,
        channel: PusherChannel,
    ) -> Result<ConnectionHandle, HandshakeError> {
        // 1. join メッセージの検証
        let name = parse_join(frame)?;

        // 2. ハブに登録
        let connection = Connection::new(name, Timestamp::new(self.clock.now_millis()), channel);
        let handle = connection.handle();
        self.hub.add(connection).await;
        tracing::info!("'{}' joined as connection '{}'", handle.name, handle.id);

        // 3. 接続中ユーザーを通知
        if let Err(e) = self.presence.publish_connected_users().await {
            tracing::error!("Failed to publish connected users: {}", e);
        }

        Ok(handle)
    }
}
