//! Session service: serializes all session mutations and routes notices.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Delivery, InMemorySessionStore, MoveValidation, Outbox, Piece, Role, RoomId,
    SessionStore, SessionSummary, Side,
};
use crate::error::GameError;

/// Rules that vary per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// When `false`, joins beyond two players receive `full`.
    pub spectators_enabled: bool,
    /// How strictly `move` proposals are checked.
    pub move_validation: MoveValidation,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            spectators_enabled: true,
            move_validation: MoveValidation::Strict,
        }
    }
}

/// Mutable state guarded by the service mutex.
#[derive(Debug)]
struct Hub {
    store: Box<dyn SessionStore>,
    /// Room each joined connection belongs to.
    bindings: HashMap<ConnectionId, RoomId>,
    outboxes: HashMap<ConnectionId, Outbox>,
}

impl Hub {
    /// Enqueues each delivery on its recipient's outbox. Recipients that
    /// have already disconnected are skipped.
    fn dispatch(&self, deliveries: Vec<Delivery>) {
        for Delivery { to, notice } in deliveries {
            if let Some(outbox) = self.outboxes.get(&to) {
                outbox.deliver(notice);
            }
        }
    }
}

/// Orchestration layer for joins, moves and disconnects.
///
/// Every operation takes the single hub lock, runs one synchronous
/// [`crate::domain::Session`] transition, enqueues the resulting notices
/// and releases the lock. Operations therefore apply strictly in arrival
/// order and never suspend mid-mutation.
#[derive(Debug)]
pub struct SessionService {
    hub: Mutex<Hub>,
    policy: SessionPolicy,
}

impl SessionService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Box<dyn SessionStore>, policy: SessionPolicy) -> Self {
        Self {
            hub: Mutex::new(Hub {
                store,
                bindings: HashMap::new(),
                outboxes: HashMap::new(),
            }),
            policy,
        }
    }

    /// Creates a service over a fresh [`InMemorySessionStore`].
    #[must_use]
    pub fn in_memory(policy: SessionPolicy) -> Self {
        Self::new(Box::new(InMemorySessionStore::new()), policy)
    }

    /// Registers a connection's outbox so it can receive notices.
    pub async fn connect(&self, outbox: Outbox) {
        let mut hub = self.hub.lock().await;
        let connection = outbox.connection();
        hub.outboxes.insert(connection, outbox);
        tracing::debug!(%connection, "connection registered");
    }

    /// Joins `connection` to `room`, creating the session on first use.
    ///
    /// Returns the bound role, or `None` when the connection was turned
    /// away with `full`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyJoined`] if the connection already holds
    /// a role in any room.
    pub async fn join(
        &self,
        connection: ConnectionId,
        room: RoomId,
    ) -> Result<Option<Role>, GameError> {
        let mut hub = self.hub.lock().await;
        if let Some(current) = hub.bindings.get(&connection) {
            return Err(GameError::AlreadyJoined(current.clone()));
        }

        let outcome = hub
            .store
            .get_or_create(&room)
            .join(connection, self.policy.spectators_enabled)?;

        match outcome.role {
            Some(role) => {
                tracing::info!(%room, %connection, %role, "connection joined");
                hub.bindings.insert(connection, room);
            }
            None => {
                tracing::info!(%room, %connection, "session full, join refused");
            }
        }
        hub.dispatch(outcome.deliveries);
        Ok(outcome.role)
    }

    /// Applies a client-proposed board and next turn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotFound`] for unknown rooms (to be
    /// ignored by the caller) or the session's rejection reason. Nothing is
    /// broadcast on error.
    pub async fn submit_move(
        &self,
        connection: ConnectionId,
        room: &RoomId,
        pieces: Vec<Piece>,
        next_turn: Side,
    ) -> Result<(), GameError> {
        let mut hub = self.hub.lock().await;
        let session = hub
            .store
            .get_mut(room)
            .ok_or_else(|| GameError::SessionNotFound(room.clone()))?;
        let deliveries =
            session.propose(connection, pieces, next_turn, self.policy.move_validation)?;
        tracing::info!(
            %room,
            %connection,
            turn = %session.turn(),
            winner = ?session.winner(),
            "move accepted"
        );
        hub.dispatch(deliveries);
        Ok(())
    }

    /// Moves one piece on behalf of `connection`; the server computes the
    /// resulting board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotFound`] for unknown rooms (to be
    /// ignored by the caller) or the session's rejection reason.
    pub async fn play(
        &self,
        connection: ConnectionId,
        room: &RoomId,
        piece_id: &str,
        target: u8,
    ) -> Result<(), GameError> {
        let mut hub = self.hub.lock().await;
        let session = hub
            .store
            .get_mut(room)
            .ok_or_else(|| GameError::SessionNotFound(room.clone()))?;
        let deliveries = session.play(connection, piece_id, target)?;
        tracing::info!(
            %room,
            %connection,
            piece = piece_id,
            target,
            winner = ?session.winner(),
            "move played"
        );
        hub.dispatch(deliveries);
        Ok(())
    }

    /// Removes `connection` from its session and drops its outbox.
    ///
    /// Remaining participants are notified; a session left empty is
    /// destroyed. Calling this for an unknown or already-removed
    /// connection is a no-op.
    pub async fn disconnect(&self, connection: ConnectionId) {
        let mut hub = self.hub.lock().await;
        hub.outboxes.remove(&connection);
        let Some(room) = hub.bindings.remove(&connection) else {
            return;
        };
        let Some(session) = hub.store.get_mut(&room) else {
            return;
        };
        let Some(departure) = session.leave(connection) else {
            return;
        };
        let now_empty = session.is_empty();
        tracing::info!(%room, %connection, role = %departure.role, "connection left");

        if now_empty {
            if let Err(err) = hub.store.remove(&room) {
                tracing::error!(%room, error = %err, "failed to destroy empty session");
            }
        } else {
            hub.dispatch(departure.deliveries);
        }
    }

    /// Summaries of all sessions, sorted by room.
    pub async fn summaries(&self) -> Vec<SessionSummary> {
        let hub = self.hub.lock().await;
        let mut summaries: Vec<SessionSummary> =
            hub.store.sessions().map(|s| s.summary()).collect();
        summaries.sort_by(|a, b| a.room.cmp(&b.room));
        summaries
    }

    /// Summary and board of one session.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotFound`] if the room has no session.
    pub async fn snapshot(&self, room: &RoomId) -> Result<(SessionSummary, Vec<Piece>), GameError> {
        let hub = self.hub.lock().await;
        let session = hub
            .store
            .get(room)
            .ok_or_else(|| GameError::SessionNotFound(room.clone()))?;
        Ok((session.summary(), session.board().pieces().to_vec()))
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.hub.lock().await.store.len()
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.hub.lock().await.outboxes.len()
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::in_memory(SessionPolicy::default())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::sync::mpsc;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::{Board, Notice};

    fn room(raw: &str) -> RoomId {
        let Ok(id) = RoomId::parse(raw) else {
            panic!("valid room id");
        };
        id
    }

    async fn connect(service: &SessionService) -> (ConnectionId, mpsc::Receiver<Notice>) {
        let id = ConnectionId::new();
        let (outbox, rx) = Outbox::channel(id, 32);
        service.connect(outbox).await;
        (id, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<Notice>) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = rx.try_recv() {
            notices.push(notice);
        }
        notices
    }

    #[tokio::test]
    async fn scenario_join_spectate_and_move() {
        let service = SessionService::default();
        let r1 = room("r1");
        let (c1, mut rx1) = connect(&service).await;
        let (c2, mut rx2) = connect(&service).await;
        let (c3, mut rx3) = connect(&service).await;

        assert_eq!(
            assert_ok!(service.join(c1, r1.clone()).await),
            Some(Role::Player(Side::A))
        );
        assert_eq!(drain(&mut rx1), vec![Notice::Joined { player: Side::A }]);

        assert_eq!(
            assert_ok!(service.join(c2, r1.clone()).await),
            Some(Role::Player(Side::B))
        );
        let start = Notice::Start {
            current_player: Side::A,
            pieces: Board::standard().into_pieces(),
        };
        assert_eq!(drain(&mut rx1), vec![start.clone()]);
        assert_eq!(
            drain(&mut rx2),
            vec![Notice::Joined { player: Side::B }, start]
        );

        assert_eq!(
            assert_ok!(service.join(c3, r1.clone()).await),
            Some(Role::Spectator)
        );
        assert_eq!(
            drain(&mut rx3),
            vec![Notice::Spectate {
                current_player: Side::A,
                pieces: Board::standard().into_pieces(),
            }]
        );

        let Ok(next) = Board::standard().play("A-P1", 5) else {
            panic!("legal move");
        };
        assert_ok!(
            service
                .submit_move(c1, &r1, next.clone().into_pieces(), Side::B)
                .await
        );
        let update = Notice::Update {
            current_player: Side::B,
            pieces: next.into_pieces(),
            winner: None,
        };
        assert_eq!(drain(&mut rx1), vec![update.clone()]);
        assert_eq!(drain(&mut rx2), vec![update.clone()]);
        assert_eq!(drain(&mut rx3), vec![update]);
    }

    #[tokio::test]
    async fn move_to_unknown_room_is_silent() {
        let service = SessionService::default();
        let (c1, mut rx1) = connect(&service).await;
        let result = service
            .submit_move(c1, &room("ghost"), Board::standard().into_pieces(), Side::B)
            .await;
        assert!(matches!(result, Err(GameError::SessionNotFound(_))));
        assert_eq!(service.session_count().await, 0);
        assert!(drain(&mut rx1).is_empty());
    }

    #[tokio::test]
    async fn rejected_move_broadcasts_nothing() {
        let service = SessionService::default();
        let r1 = room("r1");
        let (c1, mut rx1) = connect(&service).await;
        let (c2, mut rx2) = connect(&service).await;
        let _ = service.join(c1, r1.clone()).await;
        let _ = service.join(c2, r1.clone()).await;
        let _ = (drain(&mut rx1), drain(&mut rx2));

        let err = assert_err!(service.play(c2, &r1, "B-P1", 15).await);
        assert_eq!(err, GameError::NotYourTurn { turn: Side::A });
        assert!(drain(&mut rx1).is_empty());
        assert!(drain(&mut rx2).is_empty());
    }

    #[tokio::test]
    async fn second_join_on_same_connection_is_refused() {
        let service = SessionService::default();
        let (c1, _rx1) = connect(&service).await;
        let _ = service.join(c1, room("r1")).await;
        let err = assert_err!(service.join(c1, room("r2")).await);
        assert!(matches!(err, GameError::AlreadyJoined(_)));
        assert_eq!(service.session_count().await, 1);
    }

    #[tokio::test]
    async fn full_policy_refuses_third_connection() {
        let service = SessionService::in_memory(SessionPolicy {
            spectators_enabled: false,
            move_validation: MoveValidation::Strict,
        });
        let r1 = room("r1");
        let (c1, _rx1) = connect(&service).await;
        let (c2, _rx2) = connect(&service).await;
        let (c3, mut rx3) = connect(&service).await;
        let _ = service.join(c1, r1.clone()).await;
        let _ = service.join(c2, r1.clone()).await;

        assert_eq!(assert_ok!(service.join(c3, r1.clone()).await), None);
        assert_eq!(drain(&mut rx3), vec![Notice::Full]);

        // Turned-away connections stay unbound and may try another room.
        assert_eq!(
            assert_ok!(service.join(c3, room("r2")).await),
            Some(Role::Player(Side::A))
        );
    }

    #[tokio::test]
    async fn disconnects_notify_then_tear_down() {
        let service = SessionService::default();
        let r1 = room("r1");
        let (c1, _rx1) = connect(&service).await;
        let (c2, mut rx2) = connect(&service).await;
        let (c3, mut rx3) = connect(&service).await;
        for c in [c1, c2, c3] {
            let _ = service.join(c, r1.clone()).await;
        }
        let _ = service.play(c1, &r1, "A-P1", 5).await;
        let _ = (drain(&mut rx2), drain(&mut rx3));

        service.disconnect(c1).await;
        assert_eq!(drain(&mut rx2), vec![Notice::OpponentLeft]);
        assert_eq!(drain(&mut rx3), vec![Notice::PlayerLeft]);

        service.disconnect(c3).await;
        assert!(drain(&mut rx2).is_empty());
        assert_eq!(service.session_count().await, 1);

        service.disconnect(c2).await;
        assert_eq!(service.session_count().await, 0);
        assert_eq!(service.connection_count().await, 0);

        // Idempotent.
        service.disconnect(c2).await;

        let (c4, mut rx4) = connect(&service).await;
        let _ = service.join(c4, r1.clone()).await;
        assert_eq!(drain(&mut rx4), vec![Notice::Joined { player: Side::A }]);
        let Ok((summary, pieces)) = service.snapshot(&r1).await else {
            panic!("session recreated");
        };
        assert_eq!(summary.current_player, Side::A);
        assert_eq!(summary.winner, None);
        assert_eq!(pieces, Board::standard().into_pieces());
    }

    #[tokio::test]
    async fn summaries_are_sorted_by_room() {
        let service = SessionService::default();
        let (c1, _rx1) = connect(&service).await;
        let (c2, _rx2) = connect(&service).await;
        let _ = service.join(c1, room("zulu")).await;
        let _ = service.join(c2, room("alpha")).await;

        let rooms: Vec<String> = service
            .summaries()
            .await
            .into_iter()
            .map(|s| s.room)
            .collect();
        assert_eq!(rooms, vec!["alpha".to_string(), "zulu".to_string()]);
    }
}
