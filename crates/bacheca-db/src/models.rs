/// Database row types — these map directly to SQLite rows.
/// Distinct from the bacheca-types API models to keep the DB layer
/// independent.

pub struct ShoppingItemRow {
    pub id: u32,
    pub text: String,
    pub added_by: String,
    pub completed: bool,
    pub created_at: String,
}

pub struct NoteRow {
    pub id: String,
    pub message: String,
    pub author: String,
    pub color: String,
    pub created_at: String,
}
