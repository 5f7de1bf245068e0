//! Room-keyed session storage.
//!
//! [`SessionStore`] is the seam between protocol logic and where sessions
//! live. [`InMemorySessionStore`] keeps them in a `HashMap` for the life
//! of the process and builds new sessions from an injected starting
//! layout, so tests can run against isolated stores with custom boards.

use std::collections::HashMap;
use std::fmt;

use super::{Board, RoomId, Session};
use crate::error::GameError;

/// Storage for the sessions of one server.
///
/// Callers serialize access (the service holds the store behind a single
/// mutex), which makes [`SessionStore::get_or_create`] race-free.
pub trait SessionStore: fmt::Debug + Send + Sync {
    /// Returns the session for `room`, creating it with the starting layout
    /// when absent.
    fn get_or_create(&mut self, room: &RoomId) -> &mut Session;

    /// Returns the session for `room`, if any.
    fn get(&self, room: &RoomId) -> Option<&Session>;

    /// Returns the session for `room` mutably, if any.
    fn get_mut(&mut self, room: &RoomId) -> Option<&mut Session>;

    /// Removes an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotFound`] if there is no session for
    /// `room` and [`GameError::SessionNotEmpty`] if it still has
    /// participants; the session is left in place in that case.
    fn remove(&mut self, room: &RoomId) -> Result<Session, GameError>;

    /// All sessions, in no particular order.
    fn sessions(&self) -> Box<dyn Iterator<Item = &Session> + '_>;

    /// Number of live sessions.
    fn len(&self) -> usize;

    /// `true` when no session exists.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local [`SessionStore`].
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: HashMap<RoomId, Session>,
    layout: Board,
}

impl InMemorySessionStore {
    /// Creates an empty store using the standard starting layout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(Board::standard())
    }

    /// Creates an empty store whose new sessions start from `layout`.
    #[must_use]
    pub fn with_layout(layout: Board) -> Self {
        Self {
            sessions: HashMap::new(),
            layout,
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&mut self, room: &RoomId) -> &mut Session {
        let layout = &self.layout;
        self.sessions.entry(room.clone()).or_insert_with(|| {
            tracing::info!(%room, "session created");
            Session::new(room.clone(), layout.clone())
        })
    }

    fn get(&self, room: &RoomId) -> Option<&Session> {
        self.sessions.get(room)
    }

    fn get_mut(&mut self, room: &RoomId) -> Option<&mut Session> {
        self.sessions.get_mut(room)
    }

    fn remove(&mut self, room: &RoomId) -> Result<Session, GameError> {
        match self.sessions.get(room) {
            None => return Err(GameError::SessionNotFound(room.clone())),
            Some(session) if !session.is_empty() => {
                return Err(GameError::SessionNotEmpty(room.clone()));
            }
            Some(_) => {}
        }
        let session = self
            .sessions
            .remove(room)
            .ok_or_else(|| GameError::SessionNotFound(room.clone()))?;
        tracing::info!(%room, "session destroyed");
        Ok(session)
    }

    fn sessions(&self) -> Box<dyn Iterator<Item = &Session> + '_> {
        Box::new(self.sessions.values())
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Piece, PieceKind, Side};

    fn room(raw: &str) -> RoomId {
        let Ok(id) = RoomId::parse(raw) else {
            panic!("valid room id");
        };
        id
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut store = InMemorySessionStore::new();
        let a = ConnectionId::new();
        let _ = store.get_or_create(&room("r1")).join(a, true);
        let session = store.get_or_create(&room("r1"));
        assert_eq!(session.player_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_unknown_room_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get(&room("nowhere")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_refuses_occupied_session() {
        let mut store = InMemorySessionStore::new();
        let _ = store.get_or_create(&room("r1")).join(ConnectionId::new(), true);
        assert!(matches!(
            store.remove(&room("r1")),
            Err(GameError::SessionNotEmpty(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_empty_then_recreate_fresh() {
        let mut store = InMemorySessionStore::new();
        let a = ConnectionId::new();
        let session = store.get_or_create(&room("r1"));
        let _ = session.join(a, true);
        let _ = session.leave(a);

        assert!(store.remove(&room("r1")).is_ok());
        assert!(store.get(&room("r1")).is_none());
        assert!(matches!(
            store.remove(&room("r1")),
            Err(GameError::SessionNotFound(_))
        ));

        let fresh = store.get_or_create(&room("r1"));
        assert_eq!(fresh.turn(), Side::A);
        assert_eq!(fresh.winner(), None);
        assert!(fresh.board().same_layout(&Board::standard()));
    }

    #[test]
    fn injected_layout_seeds_new_sessions() {
        let Ok(layout) = Board::new(vec![Piece::new("A-H3", Side::A, PieceKind::Hero3, 12)]) else {
            panic!("valid board");
        };
        let mut store = InMemorySessionStore::with_layout(layout.clone());
        assert_eq!(store.get_or_create(&room("custom")).board(), &layout);
    }

    #[test]
    fn sessions_are_isolated_by_room() {
        let mut store = InMemorySessionStore::new();
        let _ = store.get_or_create(&room("r1")).join(ConnectionId::new(), true);
        let _ = store.get_or_create(&room("r2"));
        assert_eq!(store.sessions().count(), 2);
        assert_eq!(store.get(&room("r2")).map(Session::player_count), Some(0));
    }
}
