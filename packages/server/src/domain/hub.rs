//! ConnectionHub trait 定義
//!
//! 接続中のクライアント集合と「入力中」の名前集合を管理するハブのインターフェース。
//! 具体的な実装は Infrastructure 層が提供する。
//!
//! ## 排他制御
//!
//! 実装は 2 つの集合を 1 つのロックで保護しなければならない。
//! スナップショットが追加・削除の途中状態を観測することはなく、
//! ブロードキャストも更新途中の集合には送信しない。
//! presence 一覧は取得と送信を同じロック区間で行うため、
//! 古い一覧が新しい一覧より後に届くことはない。

use async_trait::async_trait;

use super::{Connection, ConnectionId, DisplayName, PresenceRenderError, PresenceSnapshot};

/// Outcome of one broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Number of connections the payload was queued for
    pub delivered: usize,
    /// Connections removed because their write failed
    pub pruned: Vec<ConnectionId>,
}

/// Which presence list a presence broadcast carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceList {
    /// Names of every live connection
    Connected,
    /// Names currently typing
    Typing,
}

/// Turns a sorted presence list into the frame sent to every connection
pub type PresenceRenderer = fn(Vec<DisplayName>) -> Result<String, PresenceRenderError>;

/// Connection hub trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionHub: Send + Sync {
    /// 接続を live 集合に追加
    async fn add(&self, connection: Connection);

    /// 接続を削除し、その名前を typing 集合からも削除する
    ///
    /// 存在しない場合は何もしない。削除した場合は `true`。
    async fn remove(&self, id: &ConnectionId) -> bool;

    /// 接続の名前を typing 集合に追加（冪等）
    ///
    /// live 集合にない接続に対しては何もしない。集合が変化した場合は `true`。
    async fn set_typing(&self, id: &ConnectionId) -> bool;

    /// 接続の名前を typing 集合から削除（冪等）
    async fn clear_typing(&self, id: &ConnectionId) -> bool;

    /// 参加者と入力中の名前を同時に取得
    async fn snapshot_presence(&self) -> PresenceSnapshot;

    /// 接続数
    async fn count(&self) -> usize;

    /// 全ての接続に送信し、送信に失敗した接続を同じロック区間内で削除する
    async fn broadcast(&self, content: &str) -> BroadcastReport;

    /// presence 一覧を取得し、同じロック区間内で全ての接続に送信する
    ///
    /// 接続中の名前はソート済みで重複あり、入力中の名前はソート済み。
    /// `render` が失敗した場合は何も送信しない。
    async fn broadcast_presence(
        &self,
        list: PresenceList,
        render: PresenceRenderer,
    ) -> Result<BroadcastReport, PresenceRenderError>;
}
