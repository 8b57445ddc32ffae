//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::admission::AdmissionGate;
use crate::ws::Hub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection hub: live peers, subscriptions, and dispatch.
    pub hub: Arc<Hub>,
    /// Admission gate, or `None` to admit every connection.
    pub gate: Option<Arc<dyn AdmissionGate>>,
    /// Upper bound on one admission check.
    pub admission_timeout: Duration,
    /// Maximum inbound WebSocket message size in bytes.
    pub max_message_bytes: usize,
}
