use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::hub::Channel;

/// GET /ws/display -- upgrade a slideshow display connection.
pub async fn display_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, Channel::Display, state))
}

/// GET /ws/control -- upgrade a touch-control connection.
pub async fn control_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, Channel::Control, state))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with the hub, which queues the greeting.
///   2. Spawns a sender task that forwards messages from the hub channel.
///   3. Dispatches inbound text frames on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, channel: Channel, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(%channel, conn_id = %conn_id, "WebSocket connected");

    let mut rx = state.hub.connect(channel, &conn_id, &state.store).await;

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

    // Receiver loop: dispatch inbound frames.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state
                    .hub
                    .handle_text(channel, &conn_id, text.as_str(), &state.store)
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    state.hub.disconnect(channel, &conn_id).await;
    send_task.abort();
    tracing::info!(%channel, conn_id = %conn_id, "WebSocket disconnected");
}
