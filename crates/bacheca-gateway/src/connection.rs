use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn};

use bacheca_types::events::{GatewayCommand, GatewayEvent, Table};
use bacheca_types::models::SLOT_COUNT;

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Handle a websocket connection. The family key was already checked at the
/// HTTP upgrade layer, so the connection goes straight to Ready + event loop.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher) {
    let (mut sender, mut receiver) = socket.split();

    info!("client connected to gateway");

    // Subscribe to broadcasts before greeting: once the client has seen
    // Ready, no later event may slip past this connection.
    let mut broadcast_rx = dispatcher.subscribe();

    // Greet with Ready so the client knows the fixed slot domain.
    let ready = GatewayEvent::Ready {
        slot_count: SLOT_COUNT as u32,
    };
    if sender
        .send(Message::Text(serde_json::to_string(&ready).unwrap().into()))
        .await
        .is_err()
    {
        return;
    }

    // Per-connection table subscriptions (shared between send and recv
    // tasks). An empty set means "everything".
    let subscribed_tables: Arc<std::sync::RwLock<HashSet<Table>>> =
        Arc::new(std::sync::RwLock::new(HashSet::new()));
    let send_subscriptions = subscribed_tables.clone();

    // Shared flag for heartbeat
    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received.clone();

    // Spawn task to forward broadcasts -> client, with heartbeat
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = broadcast_rx.recv() => {
                    let event = match result {
                        Ok(event) => event,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Broadcast receiver lagged by {} messages", n);
                            continue;
                        }
                        Err(_) => break,
                    };

                    if let Some(table) = event.table() {
                        let subs = send_subscriptions.read()
                            .expect("subscription lock poisoned");
                        if !subs.is_empty() && !subs.contains(&table) {
                            continue;
                        }
                    }

                    let text = serde_json::to_string(&event).unwrap();
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Read commands from client
    let recv_subscriptions = subscribed_tables.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<GatewayCommand>(&text) {
                    Ok(cmd) => handle_command(cmd, &recv_subscriptions),
                    Err(e) => {
                        warn!(
                            "bad gateway command: {} -- raw: {}",
                            e,
                            &text[..text.len().min(200)]
                        );
                    }
                },
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("client disconnected from gateway");
}

fn handle_command(cmd: GatewayCommand, subscriptions: &Arc<std::sync::RwLock<HashSet<Table>>>) {
    match cmd {
        GatewayCommand::Subscribe { tables } => {
            info!("client subscribing to {} tables", tables.len());
            let mut subs = subscriptions.write().expect("subscription lock poisoned");
            *subs = tables.into_iter().collect();
        }
    }
}
