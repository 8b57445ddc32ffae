//! Connection hub: the set of live peers and the event dispatcher.
//!
//! [`Hub`] owns everything shared between connection tasks, the
//! heartbeat sweep, and external event producers: the peer map (one
//! [`Peer`] handle per admitted connection) and the
//! [`SubscriptionRegistry`]. All sends for one connection funnel
//! through its mpsc channel into a single writer task, so frames are
//! never interleaved.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::ws::Message;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::domain::{ConnectionId, MatchId, ServerEvent, SubscriptionRegistry};

/// Handle to one admitted connection.
///
/// Held by the hub's peer map and cloned into the connection task. The
/// liveness flag starts true and is cleared by each probe; the token is
/// the forced-close switch observed by the connection's select loop.
#[derive(Debug, Clone)]
pub struct Peer {
    sender: mpsc::UnboundedSender<Message>,
    alive: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Peer {
    fn new(sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            sender,
            alive: Arc::new(AtomicBool::new(true)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Marks the connection as having answered the last liveness probe.
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::Release);
    }

    /// Returns the forced-close token for this connection.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Sends a frame if the connection is still open; a closed channel
    /// means the writer task is gone and the frame is dropped silently.
    fn send(&self, msg: Message) {
        let _ = self.sender.send(msg);
    }

    fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Shared state for all live connections plus the dispatch paths.
#[derive(Debug, Default)]
pub struct Hub {
    peers: Mutex<HashMap<ConnectionId, Peer>>,
    registry: SubscriptionRegistry,
}

impl Hub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly admitted connection and returns its peer handle.
    pub async fn register(&self, id: ConnectionId, sender: mpsc::UnboundedSender<Message>) -> Peer {
        let peer = Peer::new(sender);
        self.peers.lock().await.insert(id, peer.clone());
        peer
    }

    /// Removes a connection and purges its subscriptions.
    ///
    /// Idempotent: disconnecting an already-removed connection is a
    /// no-op, so the monitor-driven and error-driven close paths may
    /// race freely.
    pub async fn disconnect(&self, id: ConnectionId) {
        self.peers.lock().await.remove(&id);
        self.registry.purge(id).await;
    }

    /// Subscribes a connection to a match.
    pub async fn subscribe(&self, topic: MatchId, id: ConnectionId) {
        self.registry.subscribe(topic, id).await;
    }

    /// Unsubscribes a connection from a match.
    pub async fn unsubscribe(&self, topic: MatchId, id: ConnectionId) {
        self.registry.unsubscribe(topic, id).await;
    }

    /// Returns the subscription registry, for state inspection in tests
    /// and diagnostics.
    #[must_use]
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Returns the number of currently registered connections.
    pub async fn connection_count(&self) -> usize {
        self.peers.lock().await.len()
    }

    /// Delivers an event to every open connection, regardless of
    /// subscription state. Serialized once; closed peers are skipped.
    pub async fn broadcast_to_all(&self, event: &ServerEvent) {
        let frame = Message::text(event.to_json());
        let peers = self.peers.lock().await;
        for peer in peers.values() {
            if peer.is_open() {
                peer.send(frame.clone());
            }
        }
    }

    /// Delivers an event to the open subscribers of one match.
    ///
    /// An unknown or empty match is a normal condition and does
    /// nothing.
    pub async fn broadcast_to_match(&self, topic: MatchId, event: &ServerEvent) {
        let subscribers = self.registry.subscribers(topic).await;
        if subscribers.is_empty() {
            return;
        }
        let frame = Message::text(event.to_json());
        let peers = self.peers.lock().await;
        for id in subscribers {
            if let Some(peer) = peers.get(&id)
                && peer.is_open()
            {
                peer.send(frame.clone());
            }
        }
    }

    /// Announces a newly created match to every connected client.
    pub async fn broadcast_match_created(&self, data: serde_json::Value) {
        self.broadcast_to_all(&ServerEvent::MatchCreated { data }).await;
    }

    /// Delivers a commentary entry to the subscribers of its match.
    pub async fn broadcast_commentary(&self, topic: MatchId, data: serde_json::Value) {
        self.broadcast_to_match(topic, &ServerEvent::Commentary { data })
            .await;
    }

    /// One liveness sweep over all connections.
    ///
    /// A peer whose flag is still cleared did not answer the previous
    /// probe and is terminated via its token; every other peer has its
    /// flag cleared and receives a fresh probe. A connection silent
    /// across two sweeps is therefore gone by the second tick.
    pub async fn sweep(&self) {
        let peers = self.peers.lock().await;
        for (id, peer) in peers.iter() {
            if !peer.alive.load(Ordering::Acquire) {
                tracing::info!(conn = %id, "no pong since last probe, terminating");
                peer.shutdown.cancel();
                continue;
            }
            peer.alive.store(false, Ordering::Release);
            peer.send(Message::Ping(Vec::new().into()));
        }
    }
}
