//! Domain layer: identifiers, outbound events, and subscription state.
//!
//! This module contains the server-side domain model: match and
//! connection identity, the outbound event vocabulary, and the
//! subscription registry shared between the protocol handler and the
//! dispatcher.

pub mod connection_id;
pub mod event;
pub mod match_id;
pub mod registry;

pub use connection_id::ConnectionId;
pub use event::ServerEvent;
pub use match_id::MatchId;
pub use registry::SubscriptionRegistry;
