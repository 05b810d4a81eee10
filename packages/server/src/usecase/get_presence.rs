//! UseCase: presence 状態の取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{ConnectionHub, PresenceSnapshot};

/// presence 状態取得のユースケース
pub struct GetPresenceUseCase {
    hub: Arc<dyn ConnectionHub>,
}

impl GetPresenceUseCase {
    pub fn new(hub: Arc<dyn ConnectionHub>) -> Self {
        Self { hub }
    }

    pub async fn execute(&self) -> PresenceSnapshot {
        self.hub.snapshot_presence().await
    }
}
