//! Real-time relay server: every chat message, reaction and presence update
//! is broadcast to all connected WebSocket clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 8080 --static-dir ./public
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use hiroba_server::{
    infrastructure::hub::InMemoryHub,
    ui::Server,
    usecase::{
        Broadcaster, DispatchMessageUseCase, GetPresenceUseCase, JoinUseCase, LeaveUseCase,
        PresenceNotifier,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket relay with chat, reactions and presence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Directory with the client UI, served at `/`
    #[arg(short = 's', long, default_value = "public")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Hub
    // 2. Broadcaster / PresenceNotifier
    // 3. UseCases
    // 4. Server

    // 1. Create the connection hub (in-memory)
    let hub = Arc::new(InMemoryHub::new());

    // 2. Create the broadcaster and presence notifier
    let broadcaster = Broadcaster::new(hub.clone());
    let presence = Arc::new(PresenceNotifier::new(hub.clone()));

    // 3. Create UseCases
    let join_usecase = Arc::new(JoinUseCase::new(
        hub.clone(),
        presence.clone(),
        Arc::new(SystemClock),
    ));
    let dispatch_message_usecase = Arc::new(DispatchMessageUseCase::new(
        hub.clone(),
        broadcaster,
        presence.clone(),
    ));
    let leave_usecase = Arc::new(LeaveUseCase::new(hub.clone(), presence));
    let get_presence_usecase = Arc::new(GetPresenceUseCase::new(hub));

    // 4. Create and run the server
    let server = Server::new(
        join_usecase,
        dispatch_message_usecase,
        leave_usecase,
        get_presence_usecase,
    )
    .with_static_dir(args.static_dir);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
