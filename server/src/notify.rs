use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use tokio::sync::broadcast::{Receiver, Sender, error::RecvError};
use tracing::debug;

use crate::state::AppState;

/// Token pushed to clients when category data changed. Carries no payload,
/// clients re-fetch the leaderboard on receipt.
pub const UPDATE_EVENT: &str = "cat_update";

/// Best effort, no delivery guarantee. A send without subscribers is fine.
pub fn notify_update(updates: &Sender<()>) {
    let receivers = updates.send(()).unwrap_or(0);

    debug!("Emitted {UPDATE_EVENT} to {receivers} clients");
}

pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    let updates = state.updates.subscribe();

    upgrade.on_upgrade(move |socket| push_updates(socket, updates))
}

async fn push_updates(mut socket: WebSocket, mut updates: Receiver<()>) {
    loop {
        match updates.recv().await {
            // a lagged receiver only missed duplicate "re-fetch" signals
            Ok(()) | Err(RecvError::Lagged(_)) => {
                if socket
                    .send(Message::Text(UPDATE_EVENT.into()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Err(RecvError::Closed) => break,
        }
    }
}
