use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use bacheca_db::models::{NoteRow, ShoppingItemRow};
use bacheca_types::models::{Note, NoteColor, ShoppingItem};

/// Rows written by the handlers carry RFC 3339 timestamps; rows created by
/// SQLite's DEFAULT store "YYYY-MM-DD HH:MM:SS" without a timezone. Accept
/// both rather than erroring an entire listing over one odd row.
pub(crate) fn parse_timestamp(raw: &str, context: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {}: {}", raw, context, e);
            DateTime::default()
        })
}

pub(crate) fn item_from_row(row: &ShoppingItemRow) -> ShoppingItem {
    ShoppingItem {
        id: row.id,
        text: row.text.clone(),
        added_by: row.added_by.clone(),
        created_at: parse_timestamp(&row.created_at, &format!("shopping item {}", row.id)),
        completed: row.completed,
    }
}

pub(crate) fn note_from_row(row: &NoteRow) -> Note {
    Note {
        id: row.id.parse::<Uuid>().unwrap_or_else(|e| {
            warn!("Corrupt note id '{}': {}", row.id, e);
            Uuid::default()
        }),
        message: row.message.clone(),
        author: row.author.clone(),
        color: NoteColor::parse(&row.color).unwrap_or_else(|| {
            warn!("Unknown color '{}' on note '{}'", row.color, row.id);
            NoteColor::Yellow
        }),
        created_at: parse_timestamp(&row.created_at, &format!("note {}", row.id)),
    }
}
