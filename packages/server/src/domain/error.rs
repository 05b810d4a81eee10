//! ドメイン層のエラー定義

use thiserror::Error;

use super::ConnectionId;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// クライアントへのメッセージ送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先の pusher タスクが終了している（トランスポートが壊れている）
    #[error("outbound channel of connection '{0}' is closed")]
    ChannelClosed(ConnectionId),
    /// 送信キューが上限に達している（クライアントが読み取っていない）
    #[error("outbound queue of connection '{0}' is full")]
    Backlogged(ConnectionId),
}

/// presence 一覧を送信用の文字列に変換できなかった
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to render presence list: {0}")]
pub struct PresenceRenderError(pub String);
