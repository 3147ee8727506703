use crate::{handlers::AppState, models::GasSnapshot};
use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, State},
    response::Response,
};
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::time::interval;

#[derive(Serialize)]
struct DashboardUpdate {
    prices: GasSnapshot,
    timestamp: DateTime<Utc>,
}

pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let mut interval = interval(state.dashboard_interval);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let prices = match state.aggregator.snapshot().await {
                    Ok(prices) => prices,
                    Err(e) => {
                        tracing::warn!("Dashboard snapshot failed: {:#}", e);
                        continue;
                    }
                };
                let update = DashboardUpdate { prices, timestamp: Utc::now() };

                if let Ok(msg) = serde_json::to_string(&update) {
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("Dashboard socket closed");
}
