//! Read-only session inspection: list and get.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{SessionDetailResponse, SessionListResponse};
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ErrorResponse, GameError};

/// `GET /sessions`: List all live sessions.
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    summary = "List sessions",
    description = "Returns a summary of every session currently held in memory, sorted by room.",
    responses(
        (status = 200, description = "Session list", body = SessionListResponse),
    )
)]
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.session_service.summaries().await;
    Json(SessionListResponse {
        total: sessions.len(),
        sessions,
    })
}

/// `GET /sessions/{room}`: One session with its board.
///
/// # Errors
///
/// Returns [`GameError::InvalidRoomId`] for a malformed key and
/// [`GameError::SessionNotFound`] when no session exists for it.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{room}",
    tag = "Sessions",
    summary = "Get session",
    description = "Returns the summary and full board of one session.",
    params(("room" = String, Path, description = "Room key")),
    responses(
        (status = 200, description = "Session detail", body = SessionDetailResponse),
        (status = 404, description = "No session for this room", body = ErrorResponse),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let room = RoomId::parse(room)?;
    let (summary, pieces) = state.session_service.snapshot(&room).await?;
    Ok(Json(SessionDetailResponse { summary, pieces }))
}

/// Session routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{room}", get(get_session))
}
