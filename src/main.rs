//! matchcast server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay endpoint and
//! the background liveness monitor.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use matchcast::admission::{AdmissionGate, HttpAdmissionGate};
use matchcast::app_state::AppState;
use matchcast::config::RelayConfig;
use matchcast::routes::build_router;
use matchcast::ws::{Hub, heartbeat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RelayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting matchcast");

    // Build the connection hub and optional admission gate
    let hub = Arc::new(Hub::new());
    let gate: Option<Arc<dyn AdmissionGate>> = config
        .admission_url
        .as_ref()
        .map(|url| Arc::new(HttpAdmissionGate::new(url.clone())) as Arc<dyn AdmissionGate>);
    if gate.is_none() {
        tracing::info!("no admission service configured, gate disabled");
    }

    let app_state = AppState {
        hub: Arc::clone(&hub),
        gate,
        admission_timeout: Duration::from_millis(config.admission_timeout_ms),
        max_message_bytes: config.max_message_bytes,
    };

    // Build router
    let app = build_router(app_state);

    // Start the liveness monitor
    let monitor = tokio::spawn(heartbeat::run(
        Arc::clone(&hub),
        Duration::from_secs(config.heartbeat_interval_secs),
    ));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    // The monitor's timer is torn down alongside the server.
    monitor.abort();

    Ok(())
}
