use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of fixed positions in the shopping list.
pub const SLOT_COUNT: usize = 20;

/// Maximum length of a shopping item text, in characters.
pub const MAX_ITEM_TEXT: usize = 100;

/// Maximum length of a note message, in characters.
pub const MAX_NOTE_TEXT: usize = 200;

/// One position of the shopping list. The id doubles as the row key in the
/// backend table: the table is sparse and holds rows only for occupied slots,
/// while every client renders the full 0..SLOT_COUNT sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: u32,
    pub text: String,
    pub added_by: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl ShoppingItem {
    /// Canonical payload of an unoccupied slot. The timestamp is synthetic;
    /// nothing reads it while the slot is empty.
    pub fn empty(id: u32) -> Self {
        Self {
            id,
            text: String::new(),
            added_by: String::new(),
            created_at: Utc::now(),
            completed: false,
        }
    }

    /// Emptiness is the canonical "deleted" state: an empty slot never has
    /// an author or a completion flag.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The six post-it colors of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteColor {
    Yellow,
    Pink,
    Blue,
    Green,
    Orange,
    Purple,
}

impl NoteColor {
    pub const ALL: [NoteColor; 6] = [
        NoteColor::Yellow,
        NoteColor::Pink,
        NoteColor::Blue,
        NoteColor::Green,
        NoteColor::Orange,
        NoteColor::Purple,
    ];

    /// Storage token, identical to the wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteColor::Yellow => "yellow",
            NoteColor::Pink => "pink",
            NoteColor::Blue => "blue",
            NoteColor::Green => "green",
            NoteColor::Orange => "orange",
            NoteColor::Purple => "purple",
        }
    }

    pub fn parse(s: &str) -> Option<NoteColor> {
        NoteColor::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

/// A sticky note on the family board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub message: String,
    pub author: String,
    pub color: NoteColor,
    pub created_at: DateTime<Utc>,
}
