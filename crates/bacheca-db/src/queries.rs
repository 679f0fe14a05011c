use crate::Database;
use crate::models::{NoteRow, ShoppingItemRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Shopping items --

    /// All occupied slots, ordered by slot id ascending. The table is sparse:
    /// a missing id simply means that slot is empty.
    pub fn list_items(&self) -> Result<Vec<ShoppingItemRow>> {
        self.with_conn(query_items)
    }

    pub fn get_item(&self, id: u32) -> Result<Option<ShoppingItemRow>> {
        self.with_conn(|conn| query_item(conn, id))
    }

    /// Upsert the row for a slot. A text write redefines the item, so
    /// `completed` is reset and `created_at` refreshed whether the row is new
    /// or not. Returns true when a row already existed (update), false on
    /// insert; the caller broadcasts a different event for each.
    pub fn upsert_item(
        &self,
        id: u32,
        text: &str,
        added_by: &str,
        created_at: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let existing: Option<u32> = conn
                .query_row("SELECT id FROM shopping_items WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?;

            conn.execute(
                "INSERT INTO shopping_items (id, text, added_by, completed, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     text = excluded.text,
                     added_by = excluded.added_by,
                     completed = 0,
                     created_at = excluded.created_at",
                rusqlite::params![id, text, added_by, created_at],
            )?;

            Ok(existing.is_some())
        })
    }

    /// Flip `completed` on an occupied slot, leaving text and author alone.
    /// Returns the updated row, or `None` when the slot has no row.
    pub fn toggle_item(&self, id: u32) -> Result<Option<ShoppingItemRow>> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE shopping_items SET completed = 1 - completed WHERE id = ?1",
                [id],
            )?;
            if affected == 0 {
                return Ok(None);
            }
            query_item(conn, id)
        })
    }

    /// Delete a slot's row. Returns true when a row was actually removed, so
    /// the caller knows whether to broadcast; deleting an absent row is not
    /// an error.
    pub fn delete_item(&self, id: u32) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM shopping_items WHERE id = ?1", [id])?;
            Ok(affected > 0)
        })
    }

    /// Delete every row. Returns the removed ids so the caller can emit one
    /// delete event per row.
    pub fn clear_items(&self) -> Result<Vec<u32>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id FROM shopping_items ORDER BY id")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<u32>, _>>()?;

            conn.execute("DELETE FROM shopping_items", [])?;
            Ok(ids)
        })
    }

    // -- Notes --

    pub fn insert_note(&self, note: &NoteRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, message, author, color, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![note.id, note.message, note.author, note.color, note.created_at],
            )?;
            Ok(())
        })
    }

    /// All notes, oldest first.
    pub fn list_notes(&self) -> Result<Vec<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, message, author, color, created_at
                 FROM notes
                 ORDER BY created_at ASC, id ASC",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(NoteRow {
                        id: row.get(0)?,
                        message: row.get(1)?,
                        author: row.get(2)?,
                        color: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn delete_note(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
            Ok(affected > 0)
        })
    }
}

fn query_items(conn: &Connection) -> Result<Vec<ShoppingItemRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, added_by, completed, created_at
         FROM shopping_items
         ORDER BY id ASC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ShoppingItemRow {
                id: row.get(0)?,
                text: row.get(1)?,
                added_by: row.get(2)?,
                completed: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_item(conn: &Connection, id: u32) -> Result<Option<ShoppingItemRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, added_by, completed, created_at
         FROM shopping_items
         WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(ShoppingItemRow {
                id: row.get(0)?,
                text: row.get(1)?,
                added_by: row.get(2)?,
                completed: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
