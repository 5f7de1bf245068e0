//! Inbound WebSocket message types.
//!
//! Outbound messages are [`crate::domain::Notice`]s.

use serde::{Deserialize, Serialize};

use crate::domain::{Piece, Side};

/// Messages a client can send, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join (or create) the room.
    Join {
        /// Room key.
        #[serde(rename = "gameId")]
        game_id: String,
    },
    /// Propose the full board after a move, with the side to move next.
    Move {
        /// Room key.
        #[serde(rename = "gameId")]
        game_id: String,
        /// Board after the move.
        pieces: Vec<Piece>,
        /// Side to move next.
        #[serde(rename = "currentPlayer")]
        current_player: Side,
    },
    /// Move one piece; the server computes captures and the next turn.
    Play {
        /// Room key.
        #[serde(rename = "gameId")]
        game_id: String,
        /// Piece to move.
        #[serde(rename = "pieceId")]
        piece_id: String,
        /// Destination cell.
        target: u8,
    },
}

impl ClientMessage {
    /// Room key the message addresses.
    #[must_use]
    pub fn game_id(&self) -> &str {
        match self {
            Self::Join { game_id } | Self::Move { game_id, .. } | Self::Play { game_id, .. } => {
                game_id
            }
        }
    }
}
