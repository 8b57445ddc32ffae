//! WebSocket layer: admission, connection handling, dispatch, liveness.
//!
//! The WebSocket endpoint at `/ws` provides bidirectional communication
//! for real-time match event fan-out and subscription control.

pub mod connection;
pub mod handler;
pub mod heartbeat;
pub mod hub;
pub mod messages;

pub use hub::Hub;
