//! Session inspection DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Piece, SessionSummary};

/// Response for `GET /sessions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionListResponse {
    /// Session summaries, sorted by room.
    pub sessions: Vec<SessionSummary>,
    /// Number of sessions.
    pub total: usize,
}

/// Response for `GET /sessions/{room}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDetailResponse {
    /// Session summary fields.
    #[serde(flatten)]
    pub summary: SessionSummary,
    /// Current board.
    pub pieces: Vec<Piece>,
}
