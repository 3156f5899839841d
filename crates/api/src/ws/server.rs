use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use kiosk_core::broadcast::KioskConnection;
use kiosk_core::types::BroadcastEvent;

use crate::state::AppState;

pub async fn kiosk_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

/// Push-only channel: the server streams broadcast events out; inbound
/// application messages from displays are ignored.
async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(64);

    let send_task = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let connection_id = format!("conn_{}", nanoid::nanoid!(12));
    state
        .registry
        .register(KioskConnection {
            connection_id: connection_id.clone(),
            sender: outbound_tx.clone(),
            connected_at: Utc::now(),
        })
        .await;

    // Connection acknowledgment, not a state snapshot; clients fetch
    // current state separately on connect.
    let ack = BroadcastEvent::Info {
        message: "Connected to WebSocket".to_string(),
    };
    if let Ok(text) = serde_json::to_string(&ack) {
        let _ = outbound_tx.send(text).await;
    }

    info!(connection_id = %connection_id, "kiosk display connected");

    while let Some(message) = ws_receiver.next().await {
        match message {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(connection_id = %connection_id, error = %err, "websocket receive error");
                break;
            }
        }
    }

    state.registry.unregister(&connection_id).await;
    drop(outbound_tx);
    let _ = send_task.await;

    info!(connection_id = %connection_id, "kiosk display disconnected");
}
