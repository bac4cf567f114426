use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use vigil_core::command::group_id;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::manager::GroupBroadcaster;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The caller must authenticate; the connection joins the broadcast group
/// for their own account (the normalized external id), which is where
/// queued commands are delivered.
pub async fn ws_handler(
    caller: AuthUser,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let group = group_id(&caller.external_id);
    ws.on_upgrade(move |socket| handle_socket(socket, state.broadcaster, group))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with the group broadcaster.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound messages on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<GroupBroadcaster>, group: String) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, group = %group, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = broadcaster.add(conn_id.clone(), group).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: commands flow outbound only; inbound traffic is
    // keepalive noise (acknowledgment happens over HTTP).
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    broadcaster.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
