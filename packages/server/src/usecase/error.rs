//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ValueObjectError;

/// ブロードキャストのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("failed to serialize message: {0}")]
    Serialize(String),
}

/// ハンドシェイク（join）のエラー
///
/// いずれもその接続だけに致命的で、接続は登録されずに閉じられる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    #[error("first frame is not a valid message: {0}")]
    Decode(String),
    #[error("expected a join message, got '{0}'")]
    UnexpectedType(&'static str),
    #[error("invalid display name: {0}")]
    InvalidName(#[from] ValueObjectError),
    #[error("expected a text frame")]
    NonTextFrame,
    #[error("connection closed before join")]
    ConnectionClosed,
}

/// join 後のメッセージ処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// 解釈できないフレーム（接続は維持される）
    #[error("failed to decode frame: {0}")]
    Decode(String),
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}
