//! Server execution logic.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::usecase::{DispatchMessageUseCase, GetPresenceUseCase, JoinUseCase, LeaveUseCase};

use super::{
    handler::{get_presence, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_usecase,
///     dispatch_message_usecase,
///     leave_usecase,
///     get_presence_usecase,
/// )
/// .with_static_dir("public");
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinUseCase（参加のユースケース）
    join_usecase: Arc<JoinUseCase>,
    /// DispatchMessageUseCase（受信メッセージ振り分けのユースケース）
    dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    /// LeaveUseCase（退出のユースケース）
    leave_usecase: Arc<LeaveUseCase>,
    /// GetPresenceUseCase（presence 取得のユースケース）
    get_presence_usecase: Arc<GetPresenceUseCase>,
    /// Directory served at `/` (the client UI), if any
    static_dir: Option<PathBuf>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        join_usecase: Arc<JoinUseCase>,
        dispatch_message_usecase: Arc<DispatchMessageUseCase>,
        leave_usecase: Arc<LeaveUseCase>,
        get_presence_usecase: Arc<GetPresenceUseCase>,
    ) -> Self {
        Self {
            join_usecase,
            dispatch_message_usecase,
            leave_usecase,
            get_presence_usecase,
            static_dir: None,
        }
    }

    /// Serve the files of `dir` for every path not matched by the API routes
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Build the router without binding a listener
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            join_usecase: self.join_usecase,
            dispatch_message_usecase: self.dispatch_message_usecase,
            leave_usecase: self.leave_usecase,
            get_presence_usecase: self.get_presence_usecase,
        });

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/presence", get(get_presence))
            .with_state(app_state);

        let app = match self.static_dir {
            Some(dir) => {
                tracing::info!("Serving static files from {}", dir.display());
                app.fallback_service(ServeDir::new(dir))
            }
            None => app,
        };

        app.layer(TraceLayer::new_for_http())
    }

    /// Run the WebSocket relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "WebSocket relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
