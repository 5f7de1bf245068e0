//! # skirmish-gateway
//!
//! WebSocket session server for two-player skirmish matches on a 5×5
//! board, with any number of spectators.
//!
//! Clients join a room by key; the first two connections take sides A and
//! B, later ones spectate. The server owns the board, enforces turn order
//! and movement rules, detects the winner and pushes every accepted change
//! to all participants.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          REST Handlers (api/)
//!     │
//!     ├── SessionService (service/)
//!     │       single lock: store + bindings + outboxes
//!     │
//!     ├── SessionStore (domain/)    room id → Session
//!     ├── Session (domain/)         seats, board, turn, phase
//!     └── Outbox (domain/)          bounded per-connection queue
//! ```

pub mod api;
pub mod app;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
