//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), with sensible defaults for every
//! key so the relay starts with no configuration at all.

use std::net::SocketAddr;

use crate::error::RelayError;

/// Default liveness probe period in seconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Default maximum inbound message size (1 MiB). Oversized frames are
/// rejected by the transport layer before they reach the protocol
/// handler.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Seconds between liveness probe sweeps.
    pub heartbeat_interval_secs: u64,

    /// Maximum inbound WebSocket message size in bytes.
    pub max_message_bytes: usize,

    /// Endpoint of the external admission decision service. When unset
    /// the gate is disabled and every connection is admitted.
    pub admission_url: Option<String>,

    /// Upper bound in milliseconds on one admission check; a timeout is
    /// treated as a decision-service failure.
    pub admission_timeout_ms: u64,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR` is set but cannot
    /// be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| RelayError::Config(format!("LISTEN_ADDR: {e}")))?;

        let heartbeat_interval_secs =
            parse_env("HEARTBEAT_INTERVAL_SECS", DEFAULT_HEARTBEAT_INTERVAL_SECS);
        let max_message_bytes = parse_env("MAX_MESSAGE_BYTES", DEFAULT_MAX_MESSAGE_BYTES);

        let admission_url = std::env::var("ADMISSION_URL").ok().filter(|s| !s.is_empty());
        let admission_timeout_ms = parse_env("ADMISSION_TIMEOUT_MS", 1_000);

        Ok(Self {
            listen_addr,
            heartbeat_interval_secs,
            max_message_bytes,
            admission_url,
            admission_timeout_ms,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
