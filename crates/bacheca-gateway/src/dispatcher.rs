use std::sync::Arc;

use tokio::sync::broadcast;

use bacheca_types::events::GatewayEvent;

/// Fans change events out to every connected client. Writers (the REST
/// handlers) call `broadcast` after a successful row mutation; each
/// websocket connection holds a receiver and applies its own table filter.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// Broadcast channel for gateway events — all connections receive all
    /// events; per-table filtering happens in the connection loop.
    broadcast_tx: broadcast::Sender<GatewayEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    /// Subscribe to gateway events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients. Sending with no
    /// connected clients is fine; the event just evaporates.
    pub fn broadcast(&self, event: GatewayEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.inner.broadcast_tx.receiver_count()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacheca_types::events::Table;
    use bacheca_types::models::ShoppingItem;

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let dispatcher = Dispatcher::new();
        let mut rx_a = dispatcher.subscribe();
        let mut rx_b = dispatcher.subscribe();
        assert_eq!(dispatcher.receiver_count(), 2);

        dispatcher.broadcast(GatewayEvent::ItemDelete { id: 3 });

        for rx in [&mut rx_a, &mut rx_b] {
            match rx.recv().await.unwrap() {
                GatewayEvent::ItemDelete { id } => assert_eq!(id, 3),
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_does_not_fail() {
        let dispatcher = Dispatcher::new();
        dispatcher.broadcast(GatewayEvent::ItemInsert {
            item: ShoppingItem::empty(0),
        });
    }

    #[tokio::test]
    async fn events_carry_their_table_scope() {
        let dispatcher = Dispatcher::new();
        let mut rx = dispatcher.subscribe();

        dispatcher.broadcast(GatewayEvent::ItemUpdate {
            item: ShoppingItem::empty(1),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table(), Some(Table::ShoppingItems));
    }
}
