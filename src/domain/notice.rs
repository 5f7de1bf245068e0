//! Server-to-client notices.
//!
//! Every message a participant receives is a [`Notice`]. Notices are
//! produced by [`super::Session`] transitions and fanned out through each
//! recipient's [`super::Outbox`]. The serialized form is the wire format:
//! a flat JSON object discriminated by `type`.

use serde::{Deserialize, Serialize};

use super::{Piece, Side};

/// Outbound message kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// The connection took a player seat.
    Joined {
        /// Seat assigned to the connection.
        player: Side,
    },

    /// The connection is watching; carries the current position.
    Spectate {
        /// Side to move.
        #[serde(rename = "currentPlayer")]
        current_player: Side,
        /// Full board snapshot.
        pieces: Vec<Piece>,
    },

    /// Both seats are filled and play can begin (or resume).
    Start {
        /// Side to move.
        #[serde(rename = "currentPlayer")]
        current_player: Side,
        /// Full board snapshot.
        pieces: Vec<Piece>,
    },

    /// A move was accepted.
    Update {
        /// Side to move next.
        #[serde(rename = "currentPlayer")]
        current_player: Side,
        /// Board after the move.
        pieces: Vec<Piece>,
        /// Set once one side has no pieces left.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner: Option<Side>,
    },

    /// Both seats are taken and spectating is disabled.
    Full,

    /// Sent to the remaining player when the other one leaves.
    OpponentLeft,

    /// Sent to spectators when a player leaves.
    PlayerLeft,

    /// A move was rejected; state is unchanged.
    IllegalMove {
        /// Human-readable rejection reason.
        reason: String,
    },

    /// A message could not be processed.
    Error {
        /// Numeric error code (see [`crate::error::GameError::error_code`]).
        code: u32,
        /// Human-readable description.
        message: String,
    },
}

impl Notice {
    /// Returns the wire `type` discriminator.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Joined { .. } => "joined",
            Self::Spectate { .. } => "spectate",
            Self::Start { .. } => "start",
            Self::Update { .. } => "update",
            Self::Full => "full",
            Self::OpponentLeft => "opponent_left",
            Self::PlayerLeft => "player_left",
            Self::IllegalMove { .. } => "illegal_move",
            Self::Error { .. } => "error",
        }
    }
}
