use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS shopping_items (
            id          INTEGER PRIMARY KEY,
            text        TEXT NOT NULL,
            added_by    TEXT NOT NULL,
            completed   INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS notes (
            id          TEXT PRIMARY KEY,
            message     TEXT NOT NULL,
            author      TEXT NOT NULL,
            color       TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_notes_created
            ON notes(created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
