//! Shared application state.

use std::sync::Arc;

use crate::usecase::{DispatchMessageUseCase, GetPresenceUseCase, JoinUseCase, LeaveUseCase};

/// Shared application state
pub struct AppState {
    /// JoinUseCase（ハンドシェイクと登録）
    pub join_usecase: Arc<JoinUseCase>,
    /// DispatchMessageUseCase（join 後の受信メッセージの振り分け）
    pub dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    /// LeaveUseCase（切断時の後処理）
    pub leave_usecase: Arc<LeaveUseCase>,
    /// GetPresenceUseCase（presence API）
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
}
