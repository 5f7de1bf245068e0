//! Domain layer: board model, sessions, registry and outbound notices.
//!
//! Everything here is synchronous and transport-agnostic. Sessions
//! produce addressed notices; delivery to sockets happens through
//! per-connection [`Outbox`]es.

pub mod board;
pub mod connection_id;
pub mod notice;
pub mod outbox;
pub mod piece;
pub mod room_id;
pub mod session;
pub mod session_registry;
pub mod side;

pub use board::{BOARD_CELLS, BOARD_SIDE, Board, Move, MoveValidation};
pub use connection_id::ConnectionId;
pub use notice::Notice;
pub use outbox::Outbox;
pub use piece::{Piece, PieceKind};
pub use room_id::{MAX_ROOM_ID_LEN, RoomId};
pub use session::{Delivery, Departure, JoinOutcome, Session, SessionPhase, SessionSummary};
pub use session_registry::{InMemorySessionStore, SessionStore};
pub use side::{Role, Side};
