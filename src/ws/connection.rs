//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! inbound frames are dispatched to the [`SessionService`], and notices
//! queued on the connection's [`Outbox`] are written back to the socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::ClientMessage;
use crate::domain::{ConnectionId, Notice, Outbox, RoomId};
use crate::error::GameError;
use crate::service::SessionService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads client messages and applies them through the service.
/// - Forwards queued notices to the client.
/// - On close, removes the connection from its session.
pub async fn run_connection(socket: WebSocket, service: Arc<SessionService>, outbox_capacity: usize) {
    let connection = ConnectionId::new();
    let (outbox, mut notices) = Outbox::channel(connection, outbox_capacity);
    service.connect(outbox.clone()).await;
    tracing::debug!(%connection, "ws connection opened");

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_text_message(&service, connection, &text).await {
                            outbox.deliver(reply);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection, error = %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Notice queued for this connection
            notice = notices.recv() => {
                let Some(notice) = notice else { break };
                let json = match serde_json::to_string(&notice) {
                    Ok(json) => json,
                    Err(err) => {
                        tracing::error!(%connection, error = %err, "failed to encode notice");
                        continue;
                    }
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    service.disconnect(connection).await;
    tracing::debug!(%connection, "ws connection closed");
}

/// Applies one text frame, returning the reply for the sender, if any.
///
/// Malformed frames are dropped with an `error` reply and rejected moves get
/// `illegal_move`. Moves addressed to unknown or unusable room keys get
/// nothing.
async fn handle_text_message(
    service: &SessionService,
    connection: ConnectionId,
    text: &str,
) -> Option<Notice> {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(err) => {
            tracing::warn!(%connection, error = %err, "malformed ws message");
            return GameError::MalformedMessage(err.to_string()).to_notice();
        }
    };

    let result = match RoomId::parse(msg.game_id()) {
        Err(err) if matches!(msg, ClientMessage::Join { .. }) => Err(err),
        // No session can exist under a key that fails to parse.
        Err(_) => {
            tracing::debug!(%connection, "message for unusable room key ignored");
            return None;
        }
        Ok(room) => match msg {
            ClientMessage::Join { .. } => service.join(connection, room).await.map(|_| ()),
            ClientMessage::Move {
                pieces,
                current_player,
                ..
            } => {
                service
                    .submit_move(connection, &room, pieces, current_player)
                    .await
            }
            ClientMessage::Play {
                piece_id, target, ..
            } => service.play(connection, &room, &piece_id, target).await,
        },
    };

    match result {
        Ok(()) => None,
        Err(err) => {
            match &err {
                GameError::SessionNotFound(room) => {
                    tracing::debug!(%connection, %room, "message for unknown session ignored");
                }
                err if err.is_move_rejection() => {
                    tracing::info!(%connection, reason = %err, "move rejected");
                }
                err => tracing::warn!(%connection, error = %err, "ws message failed"),
            }
            err.to_notice()
        }
    }
}
