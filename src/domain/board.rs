//! Authoritative board state and the per-kind move rules.
//!
//! [`Board`] is the single source of truth for where pieces stand. It
//! generates legal moves for a piece, applies a move descriptor to produce
//! the next board, and checks whether a client-proposed board is a legal
//! successor of the current one.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{Piece, PieceKind, Side};
use crate::error::GameError;

/// Width and height of the square board.
pub const BOARD_SIDE: u8 = 5;

/// Number of cells on the board.
pub const BOARD_CELLS: u8 = BOARD_SIDE * BOARD_SIDE;

/// A destination reachable by one piece in one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Target cell index.
    pub target: u8,
    /// Whether an enemy piece on `target` is captured.
    pub captures: bool,
}

/// How much of a client-proposed board is checked before it is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveValidation {
    /// The proposal must equal the result of exactly one legal move by the
    /// side to play.
    #[default]
    Strict,
    /// Structure, piece lineage and turn order are checked; the move itself
    /// is taken on trust.
    Lenient,
}

impl FromStr for MoveValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("unknown move validation mode: {other}")),
        }
    }
}

impl fmt::Display for MoveValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Lenient => f.write_str("lenient"),
        }
    }
}

/// The set of pieces currently on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    pieces: Vec<Piece>,
}

impl Board {
    /// Wraps a piece list after checking its structure.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidBoard`] if a position is off the board,
    /// two pieces share an id, or two pieces share a cell.
    pub fn new(pieces: Vec<Piece>) -> Result<Self, GameError> {
        let mut ids = HashSet::with_capacity(pieces.len());
        let mut cells = HashSet::with_capacity(pieces.len());
        for piece in &pieces {
            if piece.position >= BOARD_CELLS {
                return Err(GameError::InvalidBoard(format!(
                    "piece {} is off the board at {}",
                    piece.id, piece.position
                )));
            }
            if !ids.insert(piece.id.as_str()) {
                return Err(GameError::InvalidBoard(format!(
                    "duplicate piece id {}",
                    piece.id
                )));
            }
            if !cells.insert(piece.position) {
                return Err(GameError::InvalidBoard(format!(
                    "cell {} is occupied twice",
                    piece.position
                )));
            }
        }
        Ok(Self { pieces })
    }

    /// Canonical starting layout: each side's rank of five pieces, mirrored
    /// across the board.
    #[must_use]
    pub fn standard() -> Self {
        let rank = [
            ("P1", PieceKind::Pawn),
            ("P2", PieceKind::Pawn),
            ("H1", PieceKind::Hero1),
            ("H2", PieceKind::Hero2),
            ("P3", PieceKind::Pawn),
        ];
        let last_row = (BOARD_SIDE - 1) * BOARD_SIDE;
        let mut pieces = Vec::with_capacity(rank.len() * 2);
        for (side, row_start) in [(Side::A, 0), (Side::B, last_row)] {
            for (col, (suffix, kind)) in (0u8..).zip(rank) {
                pieces.push(Piece::new(
                    format!("{side}-{suffix}"),
                    side,
                    kind,
                    row_start + col,
                ));
            }
        }
        Self { pieces }
    }

    /// Returns the pieces in their current order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Consumes the board, returning its pieces.
    #[must_use]
    pub fn into_pieces(self) -> Vec<Piece> {
        self.pieces
    }

    /// Looks up a piece by id.
    #[must_use]
    pub fn piece(&self, id: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Returns the piece standing on `position`, if any.
    #[must_use]
    pub fn piece_at(&self, position: u8) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.position == position)
    }

    /// Number of pieces `side` still has on the board.
    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.pieces.iter().filter(|p| p.owner == side).count()
    }

    /// All moves available to the piece with the given id.
    ///
    /// A piece travels along each of its kind's directions up to its reach,
    /// stopping at the board edge or the first occupied cell. It may land on
    /// that occupied cell only if its kind captures and the occupant is an
    /// enemy. Unknown ids yield no moves.
    #[must_use]
    pub fn legal_moves(&self, id: &str) -> Vec<Move> {
        let Some(piece) = self.piece(id) else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        for &(d_row, d_col) in piece.kind.directions() {
            for distance in 1..=piece.kind.reach() {
                let Some(target) = offset(piece.position, d_row, d_col, distance) else {
                    break;
                };
                match self.piece_at(target) {
                    None => moves.push(Move {
                        target,
                        captures: false,
                    }),
                    Some(occupant) => {
                        if piece.kind.captures() && occupant.owner != piece.owner {
                            moves.push(Move {
                                target,
                                captures: true,
                            });
                        }
                        break;
                    }
                }
            }
        }
        moves
    }

    /// Applies the move of piece `id` to `target`, returning the next board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalMove`] if the piece does not exist or
    /// `target` is not one of its legal moves.
    pub fn play(&self, id: &str, target: u8) -> Result<Self, GameError> {
        if self.piece(id).is_none() {
            return Err(GameError::IllegalMove(format!("unknown piece {id}")));
        }
        let Some(chosen) = self.legal_moves(id).into_iter().find(|m| m.target == target) else {
            return Err(GameError::IllegalMove(format!(
                "piece {id} cannot reach cell {target}"
            )));
        };

        let mut pieces: Vec<Piece> = self
            .pieces
            .iter()
            .filter(|p| !(chosen.captures && p.position == target))
            .cloned()
            .collect();
        if let Some(moved) = pieces.iter_mut().find(|p| p.id == id) {
            moved.position = target;
        }
        Ok(Self { pieces })
    }

    /// Checks that `proposed` only contains pieces already on this board,
    /// each with its original owner and kind.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidBoard`] on an unknown piece or a changed
    /// owner or kind.
    pub fn check_lineage(&self, proposed: &Self) -> Result<(), GameError> {
        for piece in &proposed.pieces {
            let Some(before) = self.piece(&piece.id) else {
                return Err(GameError::InvalidBoard(format!(
                    "piece {} is not on the board",
                    piece.id
                )));
            };
            if before.owner != piece.owner || before.kind != piece.kind {
                return Err(GameError::InvalidBoard(format!(
                    "piece {} changed owner or kind",
                    piece.id
                )));
            }
        }
        Ok(())
    }

    /// Checks that `proposed` is exactly what one legal move by `side`
    /// produces from this board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidBoard`] if lineage is broken and
    /// [`GameError::IllegalMove`] if the difference is not a single legal
    /// move by `side`.
    pub fn check_successor(&self, proposed: &Self, side: Side) -> Result<(), GameError> {
        self.check_lineage(proposed)?;

        let moved: Vec<&Piece> = proposed
            .pieces
            .iter()
            .filter(|p| self.piece(&p.id).is_some_and(|before| before.position != p.position))
            .collect();
        let [piece] = moved.as_slice() else {
            return Err(GameError::IllegalMove(format!(
                "exactly one piece must move, found {}",
                moved.len()
            )));
        };
        if piece.owner != side {
            return Err(GameError::IllegalMove(format!(
                "piece {} does not belong to side {side}",
                piece.id
            )));
        }

        let expected = self.play(&piece.id, piece.position)?;
        if expected.same_layout(proposed) {
            Ok(())
        } else {
            Err(GameError::IllegalMove(
                "resulting board does not match the move".to_string(),
            ))
        }
    }

    /// Order-insensitive equality.
    #[must_use]
    pub fn same_layout(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }

    fn sorted(&self) -> Vec<&Piece> {
        let mut pieces: Vec<&Piece> = self.pieces.iter().collect();
        pieces.sort_by(|a, b| a.id.cmp(&b.id));
        pieces
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Cell reached from `position` after `distance` unit steps along
/// `(d_row, d_col)`, or `None` if that leaves the board.
fn offset(position: u8, d_row: i8, d_col: i8, distance: u8) -> Option<u8> {
    let side = i16::from(BOARD_SIDE);
    let row = i16::from(position / BOARD_SIDE) + i16::from(d_row) * i16::from(distance);
    let col = i16::from(position % BOARD_SIDE) + i16::from(d_col) * i16::from(distance);
    if (0..side).contains(&row) && (0..side).contains(&col) {
        u8::try_from(row * side + col).ok()
    } else {
        None
    }
}
