//! Logging setup for the hiroba binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the default level when `RUST_LOG` is unset.
const APP_CRATES: [&str; 2] = ["hiroba_server", "hiroba_shared"];

/// Build the default filter directive, e.g.
/// `hiroba_server=debug,hiroba_shared=debug,tower_http=debug`.
fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut targets: Vec<String> = APP_CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, default_log_level))
        .collect();
    let binary_target = format!("{}={}", binary_name.replace('-', "_"), default_log_level);
    if !targets.contains(&binary_target) {
        targets.push(binary_target);
    }
    targets.push(format!("tower_http={}", default_log_level));
    targets.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The level can be overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
