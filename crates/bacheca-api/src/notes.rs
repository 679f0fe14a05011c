use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rand::Rng;
use tracing::error;
use uuid::Uuid;

use bacheca_db::models::NoteRow;
use bacheca_types::api::CreateNoteRequest;
use bacheca_types::events::GatewayEvent;
use bacheca_types::models::{MAX_NOTE_TEXT, Note, NoteColor};

use crate::AppStateInner;
use crate::rows::note_from_row;

pub async fn get_notes(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_notes())
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let notes: Vec<Note> = rows.iter().map(note_from_row).collect();
    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<Arc<AppStateInner>>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let message = req.message.trim().to_string();
    if message.is_empty() || message.chars().count() > MAX_NOTE_TEXT {
        return Err(StatusCode::BAD_REQUEST);
    }

    let author = req.author.trim().to_string();
    if author.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let color = req.color.unwrap_or_else(|| {
        NoteColor::ALL[rand::rng().random_range(0..NoteColor::ALL.len())]
    });

    let note = Note {
        id: Uuid::new_v4(),
        message,
        author,
        color,
        created_at: chrono::Utc::now(),
    };

    let row = NoteRow {
        id: note.id.to_string(),
        message: note.message.clone(),
        author: note.author.clone(),
        color: note.color.as_str().to_string(),
        created_at: note.created_at.to_rfc3339(),
    };

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.insert_note(&row))
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    state
        .dispatcher
        .broadcast(GatewayEvent::NoteCreate { note: note.clone() });

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn delete_note(
    State(state): State<Arc<AppStateInner>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let removed = tokio::task::spawn_blocking(move || db.db.delete_note(&id.to_string()))
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if removed {
        state.dispatcher.broadcast(GatewayEvent::NoteDelete { id });
    }

    Ok(StatusCode::NO_CONTENT)
}

fn join_error(e: tokio::task::JoinError) -> StatusCode {
    error!("spawn_blocking join error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}
