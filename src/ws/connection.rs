//! Per-connection task: read loop, writer task, and cleanup.
//!
//! Each admitted socket is split into a reader half driven by this
//! task and a writer half owned by a dedicated writer task fed through
//! an mpsc channel. Cloning the channel sender is how the hub, the
//! heartbeat sweep, and command replies all write to the same client
//! without interleaving frames.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::Hub;
use super::messages::ClientCommand;
use crate::domain::{ConnectionId, ServerEvent};

/// Close code sent when the liveness monitor terminates a connection.
const CLOSE_GOING_AWAY: u16 = 1001;

/// Runs one admitted connection to completion.
///
/// Registers the peer, sends the `welcome` event, then loops over
/// inbound frames until the client closes, the transport errors, or the
/// liveness monitor cancels the peer. Every exit path runs the same
/// cleanup: the peer is removed from the hub and its subscriptions are
/// purged.
pub async fn run_connection(socket: WebSocket, hub: Arc<Hub>) {
    let (ws_tx, mut ws_rx) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    let id = ConnectionId::new();
    let peer = hub.register(id, tx.clone()).await;
    let shutdown = peer.shutdown_token();

    let writer = tokio::spawn(writer_task(ws_tx, rx));

    let _ = tx.send(Message::text(ServerEvent::Welcome.to_json()));
    tracing::debug!(conn = %id, "connection admitted");

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                let _ = tx.send(Message::Close(Some(CloseFrame {
                    code: CLOSE_GOING_AWAY,
                    reason: "liveness timeout".into(),
                })));
                break;
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_text(text.as_str(), &hub, id).await
                            && tx.send(Message::text(reply)).is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => peer.mark_alive(),
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = tx.send(Message::Pong(payload));
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Binary(_))) => {}
                    Some(Err(err)) => {
                        tracing::warn!(conn = %id, error = %err, "transport error, terminating");
                        break;
                    }
                }
            }
        }
    }

    hub.disconnect(id).await;
    writer.abort();
    tracing::debug!(conn = %id, "connection closed");
}

/// Writer task: forwards queued frames to the WebSocket sink until the
/// channel or the sink closes.
async fn writer_task(
    mut ws_tx: futures_util::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if ws_tx.send(msg).await.is_err() {
            break;
        }
    }
}

/// Handles one inbound text frame, returning an optional JSON reply.
///
/// Unparseable bytes get an `error` reply and mutate nothing; valid
/// JSON that is not a recognized command is dropped silently.
async fn handle_text(text: &str, hub: &Hub, id: ConnectionId) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return Some(
            ServerEvent::Error {
                message: "Invalid JSON".to_string(),
            }
            .to_json(),
        );
    };

    match ClientCommand::classify(&value) {
        ClientCommand::Subscribe(match_id) => {
            hub.subscribe(match_id, id).await;
            tracing::debug!(conn = %id, match_id = %match_id, "subscribed");
            Some(ServerEvent::Subscribed { match_id }.to_json())
        }
        ClientCommand::Unsubscribe(match_id) => {
            hub.unsubscribe(match_id, id).await;
            tracing::debug!(conn = %id, match_id = %match_id, "unsubscribed");
            Some(ServerEvent::Unsubscribed { match_id }.to_json())
        }
        ClientCommand::Ignored => None,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::MatchId;

    #[tokio::test]
    async fn invalid_json_gets_error_reply_without_mutation() {
        let hub = Hub::new();
        let id = ConnectionId::new();

        let reply = handle_text("{not json", &hub, id).await;

        assert_eq!(
            reply.as_deref(),
            Some(r#"{"type":"error","message":"Invalid JSON"}"#)
        );
        assert_eq!(hub.registry().topic_count().await, 0);
    }

    #[tokio::test]
    async fn subscribe_replies_and_registers() {
        let hub = Hub::new();
        let id = ConnectionId::new();

        let reply = handle_text(r#"{"type":"subscribe","matchId":42}"#, &hub, id).await;

        assert_eq!(reply.as_deref(), Some(r#"{"type":"Subscribed","matchId":42}"#));
        assert_eq!(hub.registry().subscribers(MatchId::new(42)).await, vec![id]);
    }

    #[tokio::test]
    async fn unsubscribe_replies_and_deregisters() {
        let hub = Hub::new();
        let id = ConnectionId::new();
        hub.subscribe(MatchId::new(42), id).await;

        let reply = handle_text(r#"{"type":"unsubscribe","matchId":42}"#, &hub, id).await;

        assert_eq!(
            reply.as_deref(),
            Some(r#"{"type":"Unsubscribed","matchId":42}"#)
        );
        assert_eq!(hub.registry().topic_count().await, 0);
    }

    #[tokio::test]
    async fn unrecognized_shape_is_silent_and_inert() {
        let hub = Hub::new();
        let id = ConnectionId::new();

        let reply = handle_text(r#"{"type":"subscribe","matchId":"x"}"#, &hub, id).await;

        assert!(reply.is_none());
        assert_eq!(hub.registry().topic_count().await, 0);
    }
}
