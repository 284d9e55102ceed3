use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::broadcast::SubscriberRegistry;
use crate::state::AppState;
use crate::ws::subscriber::WsSubscriber;

/// Interval between keep-alive pings on an idle connection.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The feed is global and unauthenticated: every client receives the same
/// records.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let buffer = state.config.monitor.subscriber_buffer;
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry, buffer))
}

/// Manage a single WebSocket connection after upgrade.
///
/// 1. Registers a [`WsSubscriber`] backed by a bounded queue.
/// 2. Spawns a sender task that drains the queue into the socket and pings
///    every [`HEARTBEAT_INTERVAL`].
/// 3. Reads inbound frames until the client leaves.
/// 4. Unregisters on disconnect.
async fn handle_socket(socket: WebSocket, registry: Arc<SubscriberRegistry>, buffer: usize) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let (tx, mut rx) = mpsc::channel::<Message>(buffer);
    registry
        .register(Box::new(WsSubscriber::new(conn_id.clone(), tx)))
        .await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        // The first tick completes immediately.
        heartbeat.tick().await;

        loop {
            tokio::select! {
                queued = rx.recv() => {
                    let Some(msg) = queued else {
                        // Dropped by the registry (stuck client or shutdown).
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    };
                    if sink.send(msg).await.is_err() {
                        tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                        tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                        break;
                    }
                }
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {
                // The feed is one-way; inbound frames are ignored.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    registry.unregister(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
