//! # matchcast
//!
//! Real-time WebSocket distribution layer for live match events and
//! commentary.
//!
//! The relay accepts WebSocket connections at `/ws`, tracks which
//! connections follow which match, and fans server-originated events
//! out either to every connected client (`match_created`) or only to
//! one match's subscribers (`Commentary`). Dead connections are reaped
//! via a ping/pong heartbeat, and an optional admission gate consults
//! an external decision service before a connection is admitted.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── Admission Gate (admission.rs)
//!     ├── WS Handler (ws/handler.rs)
//!     ├── Connection task (ws/connection.rs)
//!     │
//!     ├── Hub: peers + dispatch (ws/hub.rs)
//!     ├── Liveness Monitor (ws/heartbeat.rs)
//!     │
//!     └── SubscriptionRegistry (domain/)
//! ```

pub mod admission;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod routes;
pub mod ws;
