use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Note, ShoppingItem};

/// The two synchronized tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    ShoppingItems,
    Notes,
}

/// Events sent over the websocket gateway. Every event describes a single
/// row change: the full payload for inserts and updates, the row key for
/// deletes. Clients rebuild their local view by replaying these into the
/// same reducer their own edits go through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayEvent {
    /// Server greets the connection and states the fixed slot domain.
    Ready { slot_count: u32 },

    /// A previously empty slot was written.
    ItemInsert { item: ShoppingItem },

    /// An occupied slot's payload changed (text rewrite or completion toggle).
    ItemUpdate { item: ShoppingItem },

    /// A slot's row was removed. The slot itself survives: receivers revert
    /// it to the canonical empty payload.
    ItemDelete { id: u32 },

    /// A note was pinned to the board.
    NoteCreate { note: Note },

    /// A note was taken down.
    NoteDelete { id: Uuid },
}

impl GatewayEvent {
    /// Returns the table this event is scoped to. Events that return `None`
    /// are global and are delivered to every connection regardless of its
    /// subscription.
    pub fn table(&self) -> Option<Table> {
        match self {
            Self::ItemInsert { .. } | Self::ItemUpdate { .. } | Self::ItemDelete { .. } => {
                Some(Table::ShoppingItems)
            }
            Self::NoteCreate { .. } | Self::NoteDelete { .. } => Some(Table::Notes),
            Self::Ready { .. } => None,
        }
    }
}

/// Commands sent FROM client TO server over the websocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Restrict this connection to change events for the given tables.
    /// A connection that never subscribes receives events for all tables.
    Subscribe { tables: Vec<Table> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_delete_wire_shape() {
        let json = serde_json::to_value(&GatewayEvent::ItemDelete { id: 7 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "ItemDelete", "data": { "id": 7 } })
        );
    }

    #[test]
    fn subscribe_command_round_trips_table_tokens() {
        let cmd = GatewayCommand::Subscribe {
            tables: vec![Table::ShoppingItems, Table::Notes],
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("shopping_items"));
        assert!(json.contains("notes"));
        let back: GatewayCommand = serde_json::from_str(&json).unwrap();
        let GatewayCommand::Subscribe { tables } = back;
        assert_eq!(tables, vec![Table::ShoppingItems, Table::Notes]);
    }

    #[test]
    fn table_scoping() {
        let item = crate::models::ShoppingItem::empty(0);
        assert_eq!(
            GatewayEvent::ItemInsert { item }.table(),
            Some(Table::ShoppingItems)
        );
        assert_eq!(GatewayEvent::NoteDelete { id: Uuid::new_v4() }.table(), Some(Table::Notes));
        assert_eq!(GatewayEvent::Ready { slot_count: 20 }.table(), None);
    }
}
