use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;
use uuid::Uuid;

use bacheca_types::api::CreateNoteRequest;
use bacheca_types::events::GatewayEvent;
use bacheca_types::models::{MAX_NOTE_TEXT, Note, NoteColor};

use crate::error::{ClientError, Result};
use crate::notify::Notifier;
use crate::rest::RestClient;

/// The note board as one member's client sees it.
///
/// Unlike the slot list, notes are an open set keyed by generated ids, so
/// applying an insert event is NOT idempotent by construction: the echoed
/// NoteCreate for a note this client just added would duplicate it on a
/// plain append. `apply_event` therefore dedups by id before inserting.
pub struct NoteBoard {
    notes: RwLock<Vec<Note>>,
    rest: RestClient,
    notifier: Arc<dyn Notifier>,
}

impl NoteBoard {
    pub fn new(rest: RestClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notes: RwLock::new(Vec::new()),
            rest,
            notifier,
        }
    }

    /// Fetch every note, oldest first.
    pub async fn load(&self) -> Result<()> {
        let notes = self.rest.list_notes().await?;
        *self.notes.write().await = notes;
        Ok(())
    }

    /// Pin a new note with a random board color.
    pub async fn add(&self, message: &str, author: &str) -> Result<Note> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidInput {
                field: "message",
                reason: "blank".to_string(),
            });
        }
        if trimmed.chars().count() > MAX_NOTE_TEXT {
            return Err(ClientError::InvalidInput {
                field: "message",
                reason: format!("longer than {} characters", MAX_NOTE_TEXT),
            });
        }

        let color = NoteColor::ALL[rand::rng().random_range(0..NoteColor::ALL.len())];
        let req = CreateNoteRequest {
            message: trimmed.to_string(),
            author: author.to_string(),
            color: Some(color),
        };

        let note = self.rest.create_note(&req).await?;
        self.insert_unique(note.clone()).await;

        let preview: String = if trimmed.chars().count() > 50 {
            format!("{}...", trimmed.chars().take(50).collect::<String>())
        } else {
            trimmed.to_string()
        };
        self.notifier
            .notify(&format!("Nuovo messaggio da {}", author), &preview);

        Ok(note)
    }

    /// Take a note down. Removing a note that is already gone remotely still
    /// clears it locally.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.rest.delete_note(id).await?;
        self.notes.write().await.retain(|n| n.id != id);
        Ok(())
    }

    /// Apply one change event from the gateway. Events for other tables are
    /// ignored.
    pub async fn apply_event(&self, event: &GatewayEvent) {
        match event {
            GatewayEvent::NoteCreate { note } => {
                self.insert_unique(note.clone()).await;
            }
            GatewayEvent::NoteDelete { id } => {
                self.notes.write().await.retain(|n| n.id != *id);
            }
            _ => {}
        }
    }

    pub async fn snapshot(&self) -> Vec<Note> {
        self.notes.read().await.clone()
    }

    async fn insert_unique(&self, note: Note) {
        let mut notes = self.notes.write().await;
        if !notes.iter().any(|n| n.id == note.id) {
            notes.push(note);
        }
    }
}
