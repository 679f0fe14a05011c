use serde::{Deserialize, Serialize};

use crate::models::NoteColor;

// -- Shopping list --

/// Body of `PUT /shopping/items/{id}`. The text must be non-blank after
/// trimming and at most MAX_ITEM_TEXT characters; a write always resets the
/// slot's completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteItemRequest {
    pub text: String,
    pub added_by: String,
}

/// Body of the `DELETE /shopping/items` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearAllResponse {
    pub deleted: u32,
}

// -- Notes --

/// Body of `POST /notes`. When `color` is omitted the server picks one of
/// the six board colors at random.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteRequest {
    pub message: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<NoteColor>,
}
