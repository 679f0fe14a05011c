use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use bacheca_types::events::{GatewayCommand, GatewayEvent, Table};

use crate::error::Result;

/// Subscription to the backend's change feed.
///
/// Connects to the gateway, optionally narrows the feed to a table set, and
/// yields events on a channel. A background task replies to server pings and
/// ends when the connection drops; there is no automatic reconnect, the
/// owner decides whether to connect again and reload.
pub struct GatewaySubscription {
    events: mpsc::UnboundedReceiver<GatewayEvent>,
}

impl GatewaySubscription {
    /// `base_url` is the http(s) server url; the websocket endpoint and the
    /// key query parameter are derived from it. Pass an empty `tables` slice
    /// to receive events for every table.
    pub async fn connect(base_url: &str, family_key: &str, tables: &[Table]) -> Result<Self> {
        let ws_url = format!(
            "{}/gateway?key={}",
            base_url.trim_end_matches('/').replacen("http", "ws", 1),
            family_key
        );

        let (ws_stream, _) = tokio_tungstenite::connect_async(&ws_url).await?;
        let (mut sender, mut receiver) = ws_stream.split();

        if !tables.is_empty() {
            let cmd = GatewayCommand::Subscribe {
                tables: tables.to_vec(),
            };
            sender
                .send(Message::Text(serde_json::to_string(&cmd).unwrap().into()))
                .await?;
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<GatewayEvent>(&text) {
                            Ok(event) => {
                                if event_tx.send(event).is_err() {
                                    break; // subscription dropped
                                }
                            }
                            Err(e) => warn!(
                                "bad gateway event: {} -- raw: {}",
                                e,
                                &text[..text.len().min(200)]
                            ),
                        }
                    }
                    Ok(Message::Ping(data)) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("gateway connection error: {}", e);
                        break;
                    }
                }
            }
            debug!("gateway subscription ended");
        });

        Ok(Self { events: event_rx })
    }

    /// Next event, or None once the connection has ended.
    pub async fn recv(&mut self) -> Option<GatewayEvent> {
        self.events.recv().await
    }
}
