use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use bacheca_types::api::WriteItemRequest;
use bacheca_types::events::GatewayEvent;
use bacheca_types::models::{MAX_ITEM_TEXT, SLOT_COUNT, ShoppingItem};

use crate::error::{ClientError, Result};
use crate::notify::Notifier;
use crate::reconcile::{ListStats, SlotBoard};
use crate::rest::RestClient;

/// The shopping list as one member's client sees it: a fixed sequence of
/// SLOT_COUNT slots kept in step with the backend's sparse rows.
///
/// Remote calls here follow the house failure policy: an error is returned
/// to the caller to log and abandon; nothing is retried and the local view
/// is left on the last successful state. Successful calls apply their result
/// through the same reducer the gateway events go through, so the echoed
/// event for a local edit just re-applies an identical payload.
pub struct ShoppingList {
    board: RwLock<SlotBoard>,
    rest: RestClient,
    notifier: Arc<dyn Notifier>,
}

impl ShoppingList {
    pub fn new(rest: RestClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            board: RwLock::new(SlotBoard::new(SLOT_COUNT)),
            rest,
            notifier,
        }
    }

    /// Fetch all remote rows and rebuild the local sequence. Absence of rows
    /// is not an error; the result is always exactly SLOT_COUNT slots.
    pub async fn load(&self) -> Result<()> {
        let rows = self.rest.list_items().await?;
        self.board.write().await.reset(rows);
        Ok(())
    }

    /// Write `text` into a slot on behalf of `author`. Whitespace-only text
    /// degrades to [`clear`](Self::clear): a blank row is never stored. A
    /// successful write resets the slot's completion state, because editing
    /// the text redefines the item.
    pub async fn write(&self, id: u32, text: &str, author: &str) -> Result<()> {
        assert!((id as usize) < SLOT_COUNT, "slot id out of domain: {id}");

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.clear(id, author).await;
        }
        if trimmed.chars().count() > MAX_ITEM_TEXT {
            return Err(ClientError::InvalidInput {
                field: "text",
                reason: format!("longer than {} characters", MAX_ITEM_TEXT),
            });
        }

        let req = WriteItemRequest {
            text: trimmed.to_string(),
            added_by: author.to_string(),
        };
        let item = self.rest.write_item(id, &req).await?;
        self.board.write().await.apply_row(item);

        // Best-effort; never blocks or fails the write.
        self.notifier
            .notify(&format!("{} ha aggiunto alla lista", author), trimmed);

        Ok(())
    }

    /// Clear a slot. No-op when the slot is already empty locally: there is
    /// nothing to delete and no network call is made. The slot is reverted
    /// optimistically as soon as the remote delete succeeds, so the view
    /// reaches the empty state even if the echoed event is delayed or lost.
    pub async fn clear(&self, id: u32, author: &str) -> Result<()> {
        assert!((id as usize) < SLOT_COUNT, "slot id out of domain: {id}");

        let previous = {
            let board = self.board.read().await;
            board.slot(id).clone()
        };
        if previous.is_empty() {
            debug!("clear on empty slot {} is a no-op", id);
            return Ok(());
        }

        self.rest.delete_item(id).await?;
        self.board.write().await.apply_delete(id);

        self.notifier
            .notify(&format!("{} ha rimosso dalla lista", author), &previous.text);

        Ok(())
    }

    /// Flip the completion flag. No-op when the slot is empty: there is no
    /// item to complete, and no network call is made.
    pub async fn toggle_complete(&self, id: u32) -> Result<()> {
        assert!((id as usize) < SLOT_COUNT, "slot id out of domain: {id}");

        {
            let board = self.board.read().await;
            if board.slot(id).is_empty() {
                debug!("toggle on empty slot {} is a no-op", id);
                return Ok(());
            }
        }

        let item = self.rest.toggle_item(id).await?;
        self.board.write().await.apply_row(item);
        Ok(())
    }

    /// Remove every item. Asking the user "sei sicuro?" is the caller's
    /// concern; by the time this runs the decision is made. Returns how many
    /// rows the backend removed.
    pub async fn clear_all(&self, author: &str) -> Result<u32> {
        let deleted = self.rest.clear_items().await?;
        self.board.write().await.reset(Vec::new());

        if deleted > 0 {
            self.notifier
                .notify(&format!("{} ha svuotato la lista della spesa", author), "");
        }

        Ok(deleted)
    }

    /// Apply one change event from the gateway. Insert and update both
    /// replace the slot payload wholesale; delete reverts the slot to the
    /// canonical empty payload. Duplicate or out-of-order delivery is safe
    /// because each event carries the full payload. Events for other tables
    /// are ignored.
    pub async fn apply_event(&self, event: &GatewayEvent) {
        match event {
            GatewayEvent::ItemInsert { item } | GatewayEvent::ItemUpdate { item } => {
                self.board.write().await.apply_row(item.clone());
            }
            GatewayEvent::ItemDelete { id } => {
                self.board.write().await.apply_delete(*id);
            }
            _ => {}
        }
    }

    /// Drop a quick suggestion into the first empty slot. Returns the slot
    /// written, or None when the list is full.
    pub async fn add_suggestion(&self, text: &str, author: &str) -> Result<Option<u32>> {
        let target = self.board.read().await.first_empty();
        let Some(id) = target else {
            return Ok(None);
        };
        self.write(id, text, author).await?;
        Ok(Some(id))
    }

    pub async fn snapshot(&self) -> Vec<ShoppingItem> {
        self.board.read().await.snapshot()
    }

    pub async fn stats(&self) -> ListStats {
        self.board.read().await.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LogNotifier;

    // A client pointed at a dead address: any operation that touches the
    // network fails, so these tests prove which operations never do.
    fn offline_list() -> ShoppingList {
        let rest = RestClient::new("http://127.0.0.1:9", "test-key");
        ShoppingList::new(rest, Arc::new(LogNotifier))
    }

    #[tokio::test]
    async fn whitespace_write_on_empty_slot_needs_no_network() {
        let list = offline_list();
        list.write(0, "   ", "Matteo").await.unwrap();
        assert!(list.snapshot().await[0].is_empty());
    }

    #[tokio::test]
    async fn toggle_on_empty_slot_needs_no_network() {
        let list = offline_list();
        list.toggle_complete(5).await.unwrap();
        assert!(!list.snapshot().await[5].completed);
    }

    #[tokio::test]
    async fn clear_on_empty_slot_needs_no_network() {
        let list = offline_list();
        list.clear(19, "Bea").await.unwrap();
        assert!(list.snapshot().await[19].is_empty());
    }

    #[tokio::test]
    async fn overlong_text_is_rejected_at_the_boundary() {
        let list = offline_list();
        let text = "x".repeat(MAX_ITEM_TEXT + 1);
        let err = list.write(0, &text, "Matteo").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput { field: "text", .. }));
    }

    #[tokio::test]
    async fn failed_write_leaves_local_state_untouched() {
        let list = offline_list();
        let before = list.snapshot().await;

        let result = list.write(0, "Pane", "Matteo").await;
        assert!(result.is_err());

        let after = list.snapshot().await;
        assert_eq!(before.len(), after.len());
        assert!(after[0].is_empty());
    }

    #[tokio::test]
    async fn gateway_events_drive_the_same_reducer() {
        let list = offline_list();

        let mut item = ShoppingItem::empty(2);
        item.text = "Latte".into();
        item.added_by = "Bea".into();

        list.apply_event(&GatewayEvent::ItemInsert { item: item.clone() }).await;
        assert_eq!(list.snapshot().await[2].text, "Latte");

        // Echo of the same payload: harmless redundant overwrite.
        list.apply_event(&GatewayEvent::ItemUpdate { item }).await;
        assert_eq!(list.snapshot().await[2].text, "Latte");

        list.apply_event(&GatewayEvent::ItemDelete { id: 2 }).await;
        assert!(list.snapshot().await[2].is_empty());
        assert_eq!(list.snapshot().await.len(), SLOT_COUNT);
    }
}
