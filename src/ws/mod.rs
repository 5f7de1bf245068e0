//! WebSocket layer: upgrade, connection loop and inbound messages.
//!
//! The endpoint at `/ws` carries the game protocol: clients send `join`,
//! `move` and `play`; the server pushes notices.

pub mod connection;
pub mod handler;
pub mod messages;
