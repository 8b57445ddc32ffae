//! Axum WebSocket upgrade handler with admission gating.
//!
//! Adverse admission outcomes still complete the upgrade, then
//! immediately send a close frame with a custom 4xxx code — the session
//! is never registered with the hub, so rejected clients see a clean
//! close instead of a failed handshake.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{CloseFrame, Message, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};

use super::connection::run_connection;
use crate::admission::{AdmissionDecision, RequestMeta};
use crate::app_state::AppState;

/// Close code for a denied connection ("too many requests").
pub const CLOSE_TOO_MANY_REQUESTS: u16 = 4429;
/// Close code for a challenged connection ("forbidden").
pub const CLOSE_FORBIDDEN: u16 = 4403;
/// Close code when the decision service fails or times out.
pub const CLOSE_INTERNAL_ERROR: u16 = 4500;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// When a gate is configured, the admission check runs first, bounded
/// by the configured timeout; a timeout or gate failure counts as a
/// decision-service failure and must not crash the listener. Without a
/// gate every connection is admitted unconditionally.
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let ws = ws.max_message_size(state.max_message_bytes);

    if let Some(gate) = &state.gate {
        let meta = RequestMeta::from_headers(&headers);
        let decision = tokio::time::timeout(state.admission_timeout, gate.evaluate(&meta)).await;
        match decision {
            Ok(Ok(AdmissionDecision::Allow)) => {}
            Ok(Ok(AdmissionDecision::Deny)) => {
                tracing::warn!(user_agent = %meta.user_agent, "admission denied");
                return reject(ws, CLOSE_TOO_MANY_REQUESTS, "too many requests");
            }
            Ok(Ok(AdmissionDecision::Challenge)) => {
                tracing::warn!(user_agent = %meta.user_agent, "admission challenged");
                return reject(ws, CLOSE_FORBIDDEN, "forbidden");
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "admission check failed");
                return reject(ws, CLOSE_INTERNAL_ERROR, "internal error");
            }
            Err(_) => {
                tracing::error!("admission check timed out");
                return reject(ws, CLOSE_INTERNAL_ERROR, "internal error");
            }
        }
    }

    let hub = Arc::clone(&state.hub);
    ws.on_upgrade(move |socket| run_connection(socket, hub))
}

/// Completes the upgrade, then closes immediately with the given code.
fn reject(ws: WebSocketUpgrade, code: u16, reason: &'static str) -> Response {
    ws.on_upgrade(move |mut socket| async move {
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code,
                reason: reason.into(),
            })))
            .await;
    })
    .into_response()
}
