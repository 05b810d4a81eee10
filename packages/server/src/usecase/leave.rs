//! UseCase: 退出処理
//!
//! 接続をハブから削除し（typing 集合からも名前を削除）、
//! connected_users と typing_users を通知する。

use std::sync::Arc;

use crate::domain::{ConnectionHandle, ConnectionHub};

use super::presence::PresenceNotifier;

/// 退出のユースケース
pub struct LeaveUseCase {
    hub: Arc<dyn ConnectionHub>,
    presence: Arc<PresenceNotifier>,
}

impl LeaveUseCase {
    pub fn new(hub: Arc<dyn ConnectionHub>, presence: Arc<PresenceNotifier>) -> Self {
        Self { hub, presence }
    }

    /// 退出を実行
    ///
    /// ブロードキャスト失敗で既に削除されていても presence は通知する。
    /// 削除した場合は `true`。
    pub async fn execute(&self, connection: &ConnectionHandle) -> bool {
        let removed = self.hub.remove(&connection.id).await;
        tracing::info!(
            "'{}' left (connection '{}', removed: {}), {} connection(s) remain",
            connection.name,
            connection.id,
            removed,
            self.hub.count().await
        );

        self.presence.publish_all().await;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, DisplayName, OUTBOUND_QUEUE_CAPACITY, Timestamp},
        infrastructure::hub::InMemoryHub,
        usecase::JoinUseCase,
    };
    use hiroba_shared::time::FixedClock;
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    fn create_usecase() -> (LeaveUseCase, Arc<InMemoryHub>) {
        let hub = Arc::new(InMemoryHub::new());
        let presence = Arc::new(PresenceNotifier::new(hub.clone()));
        (LeaveUseCase::new(hub.clone(), presence), hub)
    }

    async fn connect(
        hub: &InMemoryHub,
        name: &str,
    ) -> (ConnectionHandle, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let connection = Connection::new(
            DisplayName::new(name.to_string()).unwrap(),
            Timestamp::new(0),
            tx,
        );
        let handle = connection.handle();
        hub.add(connection).await;
        (handle, rx)
    }

    fn next_json(rx: &mut mpsc::Receiver<String>) -> Value {
        serde_json::from_str(&rx.try_recv().unwrap()).unwrap()
    }

    /// 受信済みのフレームのうち最後の connected_users
    fn last_connected_users(rx: &mut mpsc::Receiver<String>) -> Option<Value> {
        let mut last = None;
        while let Ok(frame) = rx.try_recv() {
            let value: Value = serde_json::from_str(&frame).unwrap();
            if value["type"] == "connected_users" {
                last = Some(value);
            }
        }
        last
    }

    #[tokio::test]
    async fn test_leave_while_typing_clears_typing_list() {
        // テスト項目: 入力中のまま切断しても typing_users に名前が残らない
        // given (前提条件):
        let (usecase, hub) = create_usecase();
        let (alice, _alice_rx) = connect(&hub, "alice").await;
        let (_bob, mut bob_rx) = connect(&hub, "bob").await;
        hub.set_typing(&alice.id).await;

        // when (操作):
        let removed = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(
            next_json(&mut bob_rx),
            json!({"type": "connected_users", "users": ["bob"], "count": 1})
        );
        assert_eq!(
            next_json(&mut bob_rx),
            json!({"type": "typing_users", "users": [], "count": 0})
        );
    }

    #[tokio::test]
    async fn test_leave_after_prune_still_publishes() {
        // テスト項目: 既に削除済みの接続でも presence は通知される
        // given (前提条件):
        let (usecase, hub) = create_usecase();
        let (alice, _alice_rx) = connect(&hub, "alice").await;
        let (_bob, mut bob_rx) = connect(&hub, "bob").await;
        hub.remove(&alice.id).await;

        // when (操作):
        let removed = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(next_json(&mut bob_rx)["count"], json!(1));
        assert_eq!(next_json(&mut bob_rx)["type"], json!("typing_users"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_join_and_leave_publish_final_live_count() {
        // テスト項目: 参加と退出が並行しても、最後に届く connected_users の人数は実際の接続数と一致する
        for round in 0..50 {
            // given (前提条件):
            let hub = Arc::new(InMemoryHub::new());
            let presence = Arc::new(PresenceNotifier::new(hub.clone()));
            let join = Arc::new(JoinUseCase::new(
                hub.clone(),
                presence.clone(),
                Arc::new(FixedClock::new(0)),
            ));
            let leave = Arc::new(LeaveUseCase::new(hub.clone(), presence));
            let (_observer, mut observer_rx) = connect(&hub, "observer").await;

            // when (操作): 8 人が同時に参加し、そのうち 4 人が退出する
            let mut tasks = Vec::new();
            for i in 0..8 {
                let join = join.clone();
                let leave = leave.clone();
                tasks.push(tokio::spawn(async move {
                    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
                    let frame = format!(r#"{{"type":"join","name":"user{}"}}"#, i);
                    let handle = join.execute(&frame, tx).await.unwrap();
                    if i % 2 == 0 {
                        tokio::task::yield_now().await;
                        leave.execute(&handle).await;
                    }
                    rx
                }));
            }
            let mut receivers = Vec::new();
            for task in tasks {
                receivers.push(task.await.unwrap());
            }

            // then (期待する結果):
            let live = hub.count().await;
            assert_eq!(live, 5, "round {}", round);
            let last = last_connected_users(&mut observer_rx).unwrap();
            assert_eq!(last["count"], json!(live), "round {}", round);
            assert_eq!(last["users"].as_array().unwrap().len(), live, "round {}", round);
        }
    }
}
