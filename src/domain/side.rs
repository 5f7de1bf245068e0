//! Sides of the board and the roles a connection can hold in a session.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the two opposing sides. Serialized as `"A"` / `"B"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Side {
    /// Moves first; starts on the top rank.
    A,
    /// Moves second; starts on the bottom rank.
    B,
}

impl Side {
    /// Both sides in seating order.
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// A connection's standing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Seated player controlling the given side.
    Player(Side),
    /// Read-only observer.
    Spectator,
}

impl Role {
    /// Returns the controlled side, or `None` for spectators.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Player(side) => Some(side),
            Self::Spectator => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(side) => write!(f, "player {side}"),
            Self::Spectator => f.write_str("spectator"),
        }
    }
}
