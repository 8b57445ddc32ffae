//! Shared subscription state: which connections follow which matches.
//!
//! [`SubscriptionRegistry`] keeps both directions of the index — match
//! to subscribers and connection to followed matches — behind a single
//! [`tokio::sync::Mutex`] so the two can never drift apart. A single
//! lock is sufficient at this scale and serializes subscription
//! mutations against dispatch reads.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use super::{ConnectionId, MatchId};

#[derive(Debug, Default)]
struct RegistryInner {
    /// Reverse index: match → subscribed connections. A key is present
    /// iff its set is non-empty.
    topics: HashMap<MatchId, HashSet<ConnectionId>>,
    /// Forward index: connection → matches it follows. Same emptiness
    /// invariant as `topics`.
    by_conn: HashMap<ConnectionId, HashSet<MatchId>>,
}

impl RegistryInner {
    fn subscribe(&mut self, topic: MatchId, conn: ConnectionId) {
        self.topics.entry(topic).or_default().insert(conn);
        self.by_conn.entry(conn).or_default().insert(topic);
    }

    fn unsubscribe(&mut self, topic: MatchId, conn: ConnectionId) {
        if let Some(set) = self.topics.get_mut(&topic) {
            set.remove(&conn);
            if set.is_empty() {
                self.topics.remove(&topic);
            }
        }
        if let Some(set) = self.by_conn.get_mut(&conn) {
            set.remove(&topic);
            if set.is_empty() {
                self.by_conn.remove(&conn);
            }
        }
    }
}

/// Central mapping from match id to the set of subscribed connections.
///
/// # Concurrency
///
/// All operations take the single internal lock, so concurrent
/// subscribe/unsubscribe on the same match, or a purge racing a
/// dispatch lookup, observe a consistent index.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: Mutex<RegistryInner>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `conn` to the subscriber set of `topic`, creating the set
    /// on first subscription. Idempotent.
    pub async fn subscribe(&self, topic: MatchId, conn: ConnectionId) {
        self.inner.lock().await.subscribe(topic, conn);
    }

    /// Removes `conn` from the subscriber set of `topic`.
    ///
    /// A no-op for unknown topics or connections not in the set. The
    /// topic key is deleted entirely when its set empties.
    pub async fn unsubscribe(&self, topic: MatchId, conn: ConnectionId) {
        self.inner.lock().await.unsubscribe(topic, conn);
    }

    /// Removes `conn` from every match it subscribed to.
    ///
    /// Called on every close path so a gone connection never lingers in
    /// a subscriber set.
    pub async fn purge(&self, conn: ConnectionId) {
        let mut inner = self.inner.lock().await;
        let Some(topics) = inner.by_conn.remove(&conn) else {
            return;
        };
        for topic in topics {
            if let Some(set) = inner.topics.get_mut(&topic) {
                set.remove(&conn);
                if set.is_empty() {
                    inner.topics.remove(&topic);
                }
            }
        }
    }

    /// Returns a snapshot of the subscribers of `topic`.
    ///
    /// Empty for unknown topics — nobody listening is a normal
    /// condition, not an error.
    pub async fn subscribers(&self, topic: MatchId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().await;
        inner
            .topics
            .get(&topic)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns a snapshot of the matches `conn` follows.
    pub async fn topics_of(&self, conn: ConnectionId) -> Vec<MatchId> {
        let inner = self.inner.lock().await;
        inner
            .by_conn
            .get(&conn)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the number of matches with at least one subscriber.
    pub async fn topic_count(&self) -> usize {
        self.inner.lock().await.topics.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribe_is_idempotent() {
        let registry = SubscriptionRegistry::new();
        let conn = ConnectionId::new();
        registry.subscribe(MatchId::new(1), conn).await;
        registry.subscribe(MatchId::new(1), conn).await;

        assert_eq!(registry.subscribers(MatchId::new(1)).await, vec![conn]);
        assert_eq!(registry.topic_count().await, 1);
    }

    #[tokio::test]
    async fn unsubscribe_unknown_topic_is_noop() {
        let registry = SubscriptionRegistry::new();
        let conn = ConnectionId::new();
        registry.subscribe(MatchId::new(1), conn).await;

        registry.unsubscribe(MatchId::new(99), conn).await;

        assert_eq!(registry.subscribers(MatchId::new(1)).await, vec![conn]);
        assert_eq!(registry.topic_count().await, 1);
    }

    #[tokio::test]
    async fn unsubscribe_absent_connection_is_noop() {
        let registry = SubscriptionRegistry::new();
        let subscriber = ConnectionId::new();
        let stranger = ConnectionId::new();
        registry.subscribe(MatchId::new(1), subscriber).await;

        registry.unsubscribe(MatchId::new(1), stranger).await;

        assert_eq!(registry.subscribers(MatchId::new(1)).await, vec![subscriber]);
    }

    #[tokio::test]
    async fn last_unsubscribe_removes_topic_key() {
        let registry = SubscriptionRegistry::new();
        let conn = ConnectionId::new();
        registry.subscribe(MatchId::new(5), conn).await;
        registry.unsubscribe(MatchId::new(5), conn).await;

        assert_eq!(registry.topic_count().await, 0);
        assert!(registry.subscribers(MatchId::new(5)).await.is_empty());
        assert!(registry.topics_of(conn).await.is_empty());
    }

    #[tokio::test]
    async fn purge_removes_connection_everywhere() {
        let registry = SubscriptionRegistry::new();
        let leaving = ConnectionId::new();
        let staying = ConnectionId::new();

        registry.subscribe(MatchId::new(1), leaving).await;
        registry.subscribe(MatchId::new(1), staying).await;
        registry.subscribe(MatchId::new(2), leaving).await;

        registry.purge(leaving).await;

        // Sole subscriber of match 2 left, so the key is gone too.
        assert_eq!(registry.topic_count().await, 1);
        assert_eq!(registry.subscribers(MatchId::new(1)).await, vec![staying]);
        assert!(registry.subscribers(MatchId::new(2)).await.is_empty());
        assert!(registry.topics_of(leaving).await.is_empty());
    }

    #[tokio::test]
    async fn purge_unknown_connection_is_noop() {
        let registry = SubscriptionRegistry::new();
        registry.purge(ConnectionId::new()).await;
        assert_eq!(registry.topic_count().await, 0);
    }

    #[tokio::test]
    async fn forward_and_reverse_index_stay_consistent() {
        let registry = SubscriptionRegistry::new();
        let conn = ConnectionId::new();

        for id in [1u64, 2, 3] {
            registry.subscribe(MatchId::new(id), conn).await;
        }
        registry.unsubscribe(MatchId::new(2), conn).await;

        let mut topics = registry.topics_of(conn).await;
        topics.sort_by_key(|t| t.as_u64());
        assert_eq!(topics, vec![MatchId::new(1), MatchId::new(3)]);
        for topic in topics {
            assert_eq!(registry.subscribers(topic).await, vec![conn]);
        }
    }
}
