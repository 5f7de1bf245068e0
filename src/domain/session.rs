//! One match: seats, spectators, board, turn and lifecycle phase.
//!
//! [`Session`] is a pure state machine. Each transition returns the
//! [`Delivery`] list it produced; the caller routes them to outboxes. No
//! transition blocks or performs I/O.
//!
//! ```text
//! Forming ──second seat filled──▶ Live ──one side eliminated──▶ Finished
//!    ▲                              │
//!    └────────player leaves─────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Board, ConnectionId, MoveValidation, Notice, Piece, Role, RoomId, Side};
use crate::error::GameError;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Fewer than two seated players; moves are refused.
    Forming,
    /// Both seats filled; the side to move may play.
    Live,
    /// One side has been eliminated. Terminal for gameplay; still
    /// joinable as a spectator view.
    Finished {
        /// Side that still has pieces.
        winner: Side,
    },
}

impl SessionPhase {
    /// Lowercase phase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forming => "forming",
            Self::Live => "live",
            Self::Finished { .. } => "finished",
        }
    }
}

/// A notice addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient.
    pub to: ConnectionId,
    /// Payload.
    pub notice: Notice,
}

/// Result of [`Session::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Role bound to the connection, or `None` when it was turned away.
    pub role: Option<Role>,
    /// Notices produced by the join.
    pub deliveries: Vec<Delivery>,
}

/// Result of [`Session::leave`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Role the connection held.
    pub role: Role,
    /// Notices for the remaining participants.
    pub deliveries: Vec<Delivery>,
}

/// Authoritative state for one match.
#[derive(Debug, Clone)]
pub struct Session {
    id: RoomId,
    seat_a: Option<ConnectionId>,
    seat_b: Option<ConnectionId>,
    spectators: Vec<ConnectionId>,
    board: Board,
    turn: Side,
    phase: SessionPhase,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session with side A to move.
    #[must_use]
    pub fn new(id: RoomId, board: Board) -> Self {
        let now = Utc::now();
        Self {
            id,
            seat_a: None,
            seat_b: None,
            spectators: Vec::new(),
            board,
            turn: Side::A,
            phase: SessionPhase::Forming,
            created_at: now,
            last_activity: now,
        }
    }

    /// Room key.
    #[must_use]
    pub const fn id(&self) -> &RoomId {
        &self.id
    }

    /// Current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    #[must_use]
    pub const fn turn(&self) -> Side {
        self.turn
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Winning side, once decided.
    #[must_use]
    pub const fn winner(&self) -> Option<Side> {
        match self.phase {
            SessionPhase::Finished { winner } => Some(winner),
            SessionPhase::Forming | SessionPhase::Live => None,
        }
    }

    /// Number of occupied seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        usize::from(self.seat_a.is_some()) + usize::from(self.seat_b.is_some())
    }

    /// Number of spectators.
    #[must_use]
    pub fn spectator_count(&self) -> usize {
        self.spectators.len()
    }

    /// `true` when nobody is seated or watching.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.player_count() == 0 && self.spectators.is_empty()
    }

    /// Role held by `connection`, if it belongs to this session.
    #[must_use]
    pub fn role_of(&self, connection: ConnectionId) -> Option<Role> {
        if self.seat_a == Some(connection) {
            Some(Role::Player(Side::A))
        } else if self.seat_b == Some(connection) {
            Some(Role::Player(Side::B))
        } else if self.spectators.contains(&connection) {
            Some(Role::Spectator)
        } else {
            None
        }
    }

    /// Binds `connection` to a role.
    ///
    /// The first free seat is taken (A before B). With both seats taken, or
    /// once the game is finished, the connection spectates, or is turned
    /// away with `full` when `allow_spectators` is `false`. Filling the
    /// second seat broadcasts `start` to everyone.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyJoined`] if the connection already holds
    /// a role here; its binding is left untouched.
    pub fn join(
        &mut self,
        connection: ConnectionId,
        allow_spectators: bool,
    ) -> Result<JoinOutcome, GameError> {
        if self.role_of(connection).is_some() {
            return Err(GameError::AlreadyJoined(self.id.clone()));
        }
        self.touch();

        let free_seat = if matches!(self.phase, SessionPhase::Finished { .. }) {
            None
        } else {
            Side::ALL.into_iter().find(|side| self.seat(*side).is_none())
        };

        let Some(side) = free_seat else {
            if !allow_spectators {
                return Ok(JoinOutcome {
                    role: None,
                    deliveries: vec![Delivery {
                        to: connection,
                        notice: Notice::Full,
                    }],
                });
            }
            self.spectators.push(connection);
            return Ok(JoinOutcome {
                role: Some(Role::Spectator),
                deliveries: vec![Delivery {
                    to: connection,
                    notice: self.spectate_notice(),
                }],
            });
        };

        *self.seat_mut(side) = Some(connection);
        let mut deliveries = vec![Delivery {
            to: connection,
            notice: Notice::Joined { player: side },
        }];

        if self.player_count() == 2 {
            self.phase = SessionPhase::Live;
            deliveries.extend(self.broadcast(&Notice::Start {
                current_player: self.turn,
                pieces: self.board.pieces().to_vec(),
            }));
        }

        Ok(JoinOutcome {
            role: Some(Role::Player(side)),
            deliveries,
        })
    }

    /// Applies a client-proposed board and next turn.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason from [`Self::authorize`], or
    /// [`GameError::IllegalMove`] / [`GameError::InvalidBoard`] when the
    /// proposal does not pass `validation`. Nothing changes on error.
    pub fn propose(
        &mut self,
        connection: ConnectionId,
        pieces: Vec<Piece>,
        next_turn: Side,
        validation: MoveValidation,
    ) -> Result<Vec<Delivery>, GameError> {
        let side = self.authorize(connection)?;
        if next_turn != side.opponent() {
            return Err(GameError::IllegalMove(format!(
                "turn must pass to side {}",
                side.opponent()
            )));
        }

        let proposed = Board::new(pieces)?;
        match validation {
            MoveValidation::Strict => self.board.check_successor(&proposed, side)?,
            MoveValidation::Lenient => self.board.check_lineage(&proposed)?,
        }
        if proposed.count(Side::A) == 0 && proposed.count(Side::B) == 0 {
            return Err(GameError::InvalidBoard(
                "board cannot be emptied of both sides".to_string(),
            ));
        }

        Ok(self.commit(proposed, next_turn))
    }

    /// Moves piece `piece_id` to `target` on behalf of `connection`,
    /// computing captures server-side.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason from [`Self::authorize`], or
    /// [`GameError::IllegalMove`] if the piece is not the mover's or the
    /// target is unreachable. Nothing changes on error.
    pub fn play(
        &mut self,
        connection: ConnectionId,
        piece_id: &str,
        target: u8,
    ) -> Result<Vec<Delivery>, GameError> {
        let side = self.authorize(connection)?;
        match self.board.piece(piece_id) {
            Some(piece) if piece.owner == side => {}
            Some(_) => {
                return Err(GameError::IllegalMove(format!(
                    "piece {piece_id} does not belong to side {side}"
                )));
            }
            None => return Err(GameError::IllegalMove(format!("unknown piece {piece_id}"))),
        }
        let next = self.board.play(piece_id, target)?;
        Ok(self.commit(next, side.opponent()))
    }

    /// Checks that `connection` may move now and returns its side.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameFinished`] once a winner is set.
    /// - [`GameError::GameNotLive`] while a seat is empty.
    /// - [`GameError::NotInSession`] for strangers.
    /// - [`GameError::SpectatorMove`] for spectators.
    /// - [`GameError::NotYourTurn`] for the side not to move.
    pub fn authorize(&self, connection: ConnectionId) -> Result<Side, GameError> {
        match self.phase {
            SessionPhase::Finished { winner } => return Err(GameError::GameFinished { winner }),
            SessionPhase::Forming => return Err(GameError::GameNotLive),
            SessionPhase::Live => {}
        }
        let role = self
            .role_of(connection)
            .ok_or_else(|| GameError::NotInSession(self.id.clone()))?;
        let side = role.side().ok_or(GameError::SpectatorMove)?;
        if side != self.turn {
            return Err(GameError::NotYourTurn { turn: self.turn });
        }
        Ok(side)
    }

    /// Removes `connection` from the session.
    ///
    /// A departing player frees its seat; the other player is told
    /// `opponent_left` and spectators `player_left`. A live game drops back
    /// to forming. Spectators leave silently. Returns `None` when the
    /// connection was not part of the session.
    pub fn leave(&mut self, connection: ConnectionId) -> Option<Departure> {
        let role = self.role_of(connection)?;
        self.touch();

        let deliveries = match role {
            Role::Player(side) => {
                *self.seat_mut(side) = None;
                if self.phase == SessionPhase::Live {
                    self.phase = SessionPhase::Forming;
                }
                let mut deliveries: Vec<Delivery> = self
                    .seats()
                    .map(|to| Delivery {
                        to,
                        notice: Notice::OpponentLeft,
                    })
                    .collect();
                deliveries.extend(self.spectators.iter().map(|&to| Delivery {
                    to,
                    notice: Notice::PlayerLeft,
                }));
                deliveries
            }
            Role::Spectator => {
                self.spectators.retain(|&c| c != connection);
                Vec::new()
            }
        };

        Some(Departure { role, deliveries })
    }

    /// Every seated player and spectator, players first.
    pub fn participants(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.seats().chain(self.spectators.iter().copied())
    }

    /// Point-in-time summary for the admin API.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            room: self.id.to_string(),
            phase: self.phase.as_str().to_string(),
            current_player: self.turn,
            winner: self.winner(),
            players: self.player_count(),
            spectators: self.spectator_count(),
            pieces_a: self.board.count(Side::A),
            pieces_b: self.board.count(Side::B),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }

    fn commit(&mut self, board: Board, next_turn: Side) -> Vec<Delivery> {
        self.touch();
        self.board = board;
        self.turn = next_turn;

        if self.board.count(Side::A) == 0 {
            self.phase = SessionPhase::Finished { winner: Side::B };
        } else if self.board.count(Side::B) == 0 {
            self.phase = SessionPhase::Finished { winner: Side::A };
        }

        self.broadcast(&Notice::Update {
            current_player: self.turn,
            pieces: self.board.pieces().to_vec(),
            winner: self.winner(),
        })
    }

    fn broadcast(&self, notice: &Notice) -> Vec<Delivery> {
        self.participants()
            .map(|to| Delivery {
                to,
                notice: notice.clone(),
            })
            .collect()
    }

    fn spectate_notice(&self) -> Notice {
        Notice::Spectate {
            current_player: self.turn,
            pieces: self.board.pieces().to_vec(),
        }
    }

    fn seats(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.seat_a.into_iter().chain(self.seat_b)
    }

    const fn seat(&self, side: Side) -> Option<ConnectionId> {
        match side {
            Side::A => self.seat_a,
            Side::B => self.seat_b,
        }
    }

    fn seat_mut(&mut self, side: Side) -> &mut Option<ConnectionId> {
        match side {
            Side::A => &mut self.seat_a,
            Side::B => &mut self.seat_b,
        }
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

/// Lightweight view of a session for listing endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Room key.
    pub room: String,
    /// `forming`, `live` or `finished`.
    pub phase: String,
    /// Side to move.
    pub current_player: Side,
    /// Winner, once decided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
    /// Occupied seats (0–2).
    pub players: usize,
    /// Number of spectators.
    pub spectators: usize,
    /// Pieces left for side A.
    pub pieces_a: usize,
    /// Pieces left for side B.
    pub pieces_b: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last join, leave or move.
    pub last_activity: DateTime<Utc>,
}
