//! Pieces and their movement characteristics.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Side;

const ORTHOGONAL: &[(i8, i8)] = &[(-1, 0), (1, 0), (0, -1), (0, 1)];
const VERTICAL: &[(i8, i8)] = &[(-1, 0), (1, 0)];
const HORIZONTAL: &[(i8, i8)] = &[(0, -1), (0, 1)];
const DIAGONAL: &[(i8, i8)] = &[(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Piece kind. Determines direction, reach and capture ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PieceKind {
    /// Steps one cell orthogonally onto an empty cell. Never captures.
    Pawn,
    /// Slides up to two cells vertically, capturing on landing.
    Hero1,
    /// Slides up to two cells diagonally, capturing on landing.
    Hero2,
    /// Slides up to two cells horizontally, capturing on landing.
    Hero3,
}

impl PieceKind {
    /// Unit `(row, col)` directions this kind may travel along.
    #[must_use]
    pub const fn directions(self) -> &'static [(i8, i8)] {
        match self {
            Self::Pawn => ORTHOGONAL,
            Self::Hero1 => VERTICAL,
            Self::Hero2 => DIAGONAL,
            Self::Hero3 => HORIZONTAL,
        }
    }

    /// Maximum number of cells travelled in one move.
    #[must_use]
    pub const fn reach(self) -> u8 {
        match self {
            Self::Pawn => 1,
            Self::Hero1 | Self::Hero2 | Self::Hero3 => 2,
        }
    }

    /// Whether this kind may land on an enemy-occupied cell.
    #[must_use]
    pub const fn captures(self) -> bool {
        !matches!(self, Self::Pawn)
    }
}

/// A single piece on the board.
///
/// Wire shape: `{ "id": "A-P1", "player": "A", "type": "Pawn", "position": 0 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Piece {
    /// Identifier, unique within a session and immutable.
    pub id: String,
    /// Owning side.
    #[serde(rename = "player")]
    pub owner: Side,
    /// Movement kind.
    #[serde(rename = "type")]
    pub kind: PieceKind,
    /// Cell index, `row * 5 + col`.
    ///
    /// Decoding only accepts `0..=255`; anything else makes the whole frame
    /// malformed. In-range values past the last cell decode and are refused
    /// by [`Board::new`](super::Board::new) as off-board.
    pub position: u8,
}

impl Piece {
    /// Creates a piece.
    #[must_use]
    pub fn new(id: impl Into<String>, owner: Side, kind: PieceKind, position: u8) -> Self {
        Self {
            id: id.into(),
            owner,
            kind,
            position,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names() {
        let piece = Piece::new("A-H1", Side::A, PieceKind::Hero1, 2);
        let Ok(value) = serde_json::to_value(&piece) else {
            panic!("serialization failed");
        };
        assert_eq!(value["id"], "A-H1");
        assert_eq!(value["player"], "A");
        assert_eq!(value["type"], "Hero1");
        assert_eq!(value["position"], 2);
    }

    #[test]
    fn position_outside_byte_range_does_not_decode() {
        for position in ["-1", "256", "2.5"] {
            let raw = format!(r#"{{"id":"A-P1","player":"A","type":"Pawn","position":{position}}}"#);
            assert!(serde_json::from_str::<Piece>(&raw).is_err(), "{position}");
        }
        let raw = r#"{"id":"A-P1","player":"A","type":"Pawn","position":255}"#;
        assert!(serde_json::from_str::<Piece>(raw).is_ok());
    }

    #[test]
    fn pawn_is_the_only_non_capturing_kind() {
        assert!(!PieceKind::Pawn.captures());
        assert!(PieceKind::Hero1.captures());
        assert!(PieceKind::Hero2.captures());
        assert!(PieceKind::Hero3.captures());
    }
}
