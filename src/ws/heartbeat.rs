//! Liveness monitor: periodic ping sweep over all connections.
//!
//! Runs as a single background task for the whole server. Each tick
//! delegates to [`Hub::sweep`], which terminates peers that never
//! answered the previous probe and probes the rest. The task is
//! aborted alongside the server, so the timer never outlives the
//! listener.

use std::sync::Arc;
use std::time::Duration;

use super::hub::Hub;

/// Runs the liveness sweep every `period` until the task is aborted.
///
/// The first interval tick fires immediately and is skipped so fresh
/// connections get a full period before their first probe.
pub async fn run(hub: Arc<Hub>, period: Duration) {
    let mut timer = tokio::time::interval(period);
    timer.tick().await;

    loop {
        timer.tick().await;
        hub.sweep().await;
    }
}
