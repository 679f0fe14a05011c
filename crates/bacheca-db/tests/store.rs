use bacheca_db::Database;
use bacheca_db::models::NoteRow;

fn open_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("bacheca.db")).unwrap();
    (dir, db)
}

#[test]
fn list_is_sparse_and_ordered() {
    let (_dir, db) = open_db();

    db.upsert_item(7, "Latte", "Bea", "2025-01-10T09:00:00Z").unwrap();
    db.upsert_item(0, "Pane", "Matteo", "2025-01-10T09:01:00Z").unwrap();
    db.upsert_item(19, "Uova", "Michela", "2025-01-10T09:02:00Z").unwrap();

    let rows = db.list_items().unwrap();
    let ids: Vec<u32> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 7, 19]);
    assert_eq!(rows[0].text, "Pane");
    assert_eq!(rows[0].added_by, "Matteo");
    assert!(!rows[0].completed);
}

#[test]
fn upsert_reports_insert_vs_update_and_resets_completed() {
    let (_dir, db) = open_db();

    let existed = db.upsert_item(3, "Pasta", "Giuseppe", "2025-01-10T10:00:00Z").unwrap();
    assert!(!existed, "first write occupies an empty slot");

    let row = db.toggle_item(3).unwrap().unwrap();
    assert!(row.completed);

    // Rewriting the slot redefines the item: author changes, completion resets.
    let existed = db.upsert_item(3, "Pasta integrale", "Bea", "2025-01-10T11:00:00Z").unwrap();
    assert!(existed);

    let row = db.get_item(3).unwrap().unwrap();
    assert_eq!(row.text, "Pasta integrale");
    assert_eq!(row.added_by, "Bea");
    assert!(!row.completed);
    assert_eq!(row.created_at, "2025-01-10T11:00:00Z");
}

#[test]
fn toggle_missing_row_is_none() {
    let (_dir, db) = open_db();
    assert!(db.toggle_item(5).unwrap().is_none());
}

#[test]
fn toggle_preserves_text_and_author() {
    let (_dir, db) = open_db();
    db.upsert_item(0, "Pane", "Matteo", "2025-01-10T09:00:00Z").unwrap();

    let row = db.toggle_item(0).unwrap().unwrap();
    assert_eq!(row.text, "Pane");
    assert_eq!(row.added_by, "Matteo");
    assert!(row.completed);

    let row = db.toggle_item(0).unwrap().unwrap();
    assert!(!row.completed);
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let (_dir, db) = open_db();
    db.upsert_item(2, "Frutta", "Michela", "2025-01-10T09:00:00Z").unwrap();

    assert!(db.delete_item(2).unwrap());
    assert!(!db.delete_item(2).unwrap(), "second delete finds nothing");
    assert!(db.get_item(2).unwrap().is_none());
}

#[test]
fn clear_items_returns_removed_ids() {
    let (_dir, db) = open_db();
    db.upsert_item(4, "Carne", "Matteo", "2025-01-10T09:00:00Z").unwrap();
    db.upsert_item(1, "Formaggio", "Bea", "2025-01-10T09:01:00Z").unwrap();

    let ids = db.clear_items().unwrap();
    assert_eq!(ids, vec![1, 4]);
    assert!(db.list_items().unwrap().is_empty());

    assert!(db.clear_items().unwrap().is_empty(), "clearing an empty table removes nothing");
}

#[test]
fn notes_round_trip_oldest_first() {
    let (_dir, db) = open_db();

    db.insert_note(&NoteRow {
        id: "b1".into(),
        message: "Ricordati il dentista".into(),
        author: "Michela".into(),
        color: "pink".into(),
        created_at: "2025-01-11T08:00:00Z".into(),
    })
    .unwrap();
    db.insert_note(&NoteRow {
        id: "a1".into(),
        message: "Cena dai nonni sabato".into(),
        author: "Matteo".into(),
        color: "yellow".into(),
        created_at: "2025-01-10T20:00:00Z".into(),
    })
    .unwrap();

    let notes = db.list_notes().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, "a1", "oldest note comes first");
    assert_eq!(notes[1].color, "pink");

    assert!(db.delete_note("a1").unwrap());
    assert!(!db.delete_note("a1").unwrap());
    assert_eq!(db.list_notes().unwrap().len(), 1);
}
