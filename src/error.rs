//! Game error types with wire and HTTP mapping.
//!
//! [`GameError`] is the central error type. Over WebSocket each variant
//! becomes an `illegal_move` or `error` notice (or nothing, for unknown
//! rooms); over REST it maps to a status code and a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Notice, RoomId, Side};

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "session not found: r1"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request / 422        |
/// | 2000–2999 | Session state   | 404 Not Found / 409 Conflict |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Inbound frame could not be parsed.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Room key is empty or too long.
    #[error("invalid room id: {0}")]
    InvalidRoomId(String),

    /// Proposed board is structurally invalid.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// Move breaks the movement rules.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// No session exists for the room.
    #[error("session not found: {0}")]
    SessionNotFound(RoomId),

    /// Session still has participants.
    #[error("session {0} is not empty")]
    SessionNotEmpty(RoomId),

    /// Connection is not a participant of the room it addressed.
    #[error("not a participant of session {0}")]
    NotInSession(RoomId),

    /// Connection already holds a role.
    #[error("already joined session {0}")]
    AlreadyJoined(RoomId),

    /// A seat is empty, so nobody may move.
    #[error("game has not started")]
    GameNotLive,

    /// Winner already decided.
    #[error("game is over; side {winner} won")]
    GameFinished {
        /// Winning side.
        winner: Side,
    },

    /// Spectators cannot move.
    #[error("spectators cannot move")]
    SpectatorMove,

    /// The other side is to move.
    #[error("not your turn; side {turn} to move")]
    NotYourTurn {
        /// Side to move.
        turn: Side,
    },
}

impl GameError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedMessage(_) => 1001,
            Self::InvalidRoomId(_) => 1002,
            Self::InvalidBoard(_) => 1003,
            Self::IllegalMove(_) => 1004,
            Self::SessionNotFound(_) => 2001,
            Self::SessionNotEmpty(_) => 2002,
            Self::NotInSession(_) => 2003,
            Self::AlreadyJoined(_) => 2004,
            Self::GameNotLive => 2005,
            Self::GameFinished { .. } => 2006,
            Self::SpectatorMove => 2007,
            Self::NotYourTurn { .. } => 2008,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedMessage(_) | Self::InvalidRoomId(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBoard(_) | Self::IllegalMove(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::SessionNotEmpty(_)
            | Self::NotInSession(_)
            | Self::AlreadyJoined(_)
            | Self::GameNotLive
            | Self::GameFinished { .. }
            | Self::SpectatorMove
            | Self::NotYourTurn { .. } => StatusCode::CONFLICT,
        }
    }

    /// `true` for rejections of a submitted move.
    #[must_use]
    pub const fn is_move_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidBoard(_)
                | Self::IllegalMove(_)
                | Self::NotInSession(_)
                | Self::GameNotLive
                | Self::GameFinished { .. }
                | Self::SpectatorMove
                | Self::NotYourTurn { .. }
        )
    }

    /// Notice to send back to the originating connection.
    ///
    /// Unknown rooms are ignored silently and yield `None`.
    #[must_use]
    pub fn to_notice(&self) -> Option<Notice> {
        match self {
            Self::SessionNotFound(_) => None,
            err if err.is_move_rejection() => Some(Notice::IllegalMove {
                reason: err.to_string(),
            }),
            err => Some(Notice::Error {
                code: err.error_code(),
                message: err.to_string(),
            }),
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn room() -> RoomId {
        let Ok(id) = RoomId::parse("r1") else {
            panic!("valid room id");
        };
        id
    }

    #[test]
    fn unknown_room_is_silent() {
        assert_eq!(GameError::SessionNotFound(room()).to_notice(), None);
    }

    #[test]
    fn move_rejections_become_illegal_move() {
        let notice = GameError::NotYourTurn { turn: Side::B }.to_notice();
        assert_eq!(
            notice,
            Some(Notice::IllegalMove {
                reason: "not your turn; side B to move".to_string()
            })
        );
        assert!(matches!(
            GameError::SpectatorMove.to_notice(),
            Some(Notice::IllegalMove { .. })
        ));
    }

    #[test]
    fn other_errors_carry_code() {
        let notice = GameError::MalformedMessage("eof".to_string()).to_notice();
        assert_eq!(
            notice,
            Some(Notice::Error {
                code: 1001,
                message: "malformed message: eof".to_string()
            })
        );
        assert!(matches!(
            GameError::AlreadyJoined(room()).to_notice(),
            Some(Notice::Error { code: 2004, .. })
        ));
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(
            GameError::SessionNotFound(room()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GameError::InvalidRoomId(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GameError::NotYourTurn { turn: Side::B }.into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
