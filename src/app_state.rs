//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::SessionService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session service for all game logic.
    pub session_service: Arc<SessionService>,
    /// Queue length for each new connection's outbox.
    pub outbox_capacity: usize,
}

impl AppState {
    /// Creates application state around `session_service`.
    #[must_use]
    pub const fn new(session_service: Arc<SessionService>, outbox_capacity: usize) -> Self {
        Self {
            session_service,
            outbox_capacity,
        }
    }
}
