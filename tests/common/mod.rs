//! Shared harness: spawns a server on an ephemeral port and drives
//! WebSocket clients against it.

#![allow(clippy::panic, dead_code, missing_debug_implementations)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use skirmish_gateway::app::build_app;
use skirmish_gateway::app_state::AppState;
use skirmish_gateway::domain::Notice;
use skirmish_gateway::service::{SessionPolicy, SessionService};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Starts a server with `policy` and returns its address.
pub async fn spawn_server(policy: SessionPolicy) -> SocketAddr {
    let service = Arc::new(SessionService::in_memory(policy));
    let app = build_app(AppState::new(service, 64));
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A WebSocket game client.
pub struct Client {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Client {
    /// Connects to the server's `/ws` endpoint.
    pub async fn connect(addr: SocketAddr) -> Self {
        let Ok((ws, _)) = connect_async(format!("ws://{addr}/ws")).await else {
            panic!("ws connect failed");
        };
        Self { ws }
    }

    /// Sends a raw JSON value as a text frame.
    pub async fn send(&mut self, value: serde_json::Value) {
        self.send_text(&value.to_string()).await;
    }

    /// Sends a raw text frame.
    pub async fn send_text(&mut self, text: &str) {
        if self.ws.send(Message::text(text.to_string())).await.is_err() {
            panic!("ws send failed");
        }
    }

    /// Sends `join` for `room`.
    pub async fn join(&mut self, room: &str) {
        self.send(serde_json::json!({ "type": "join", "gameId": room }))
            .await;
    }

    /// Waits for the next notice.
    pub async fn recv(&mut self) -> Notice {
        loop {
            let Ok(frame) = tokio::time::timeout(RECV_TIMEOUT, self.ws.next()).await else {
                panic!("timed out waiting for notice");
            };
            match frame {
                Some(Ok(Message::Text(text))) => {
                    let Ok(notice) = serde_json::from_str::<Notice>(text.as_str()) else {
                        panic!("unparseable notice: {}", text.as_str());
                    };
                    return notice;
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    }

    /// Closes the connection.
    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
