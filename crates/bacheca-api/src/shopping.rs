use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use bacheca_types::api::{ClearAllResponse, WriteItemRequest};
use bacheca_types::events::GatewayEvent;
use bacheca_types::models::{MAX_ITEM_TEXT, SLOT_COUNT, ShoppingItem};

use crate::AppStateInner;
use crate::rows::item_from_row;

/// The sparse row set: only occupied slots come back, ordered by slot id.
/// Reconstructing the full fixed-length sequence is the client's job.
pub async fn get_items(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_items())
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let items: Vec<ShoppingItem> = rows.iter().map(item_from_row).collect();
    Ok(Json(items))
}

/// Upsert a slot's row. Writing text redefines the item, so the completion
/// flag is always reset. Blank text is rejected here: the client degrades a
/// blank write to a delete before it ever reaches this handler, and the
/// table must never hold blank rows.
pub async fn write_item(
    State(state): State<Arc<AppStateInner>>,
    Path(id): Path<u32>,
    Json(req): Json<WriteItemRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if id as usize >= SLOT_COUNT {
        return Err(StatusCode::BAD_REQUEST);
    }

    let text = req.text.trim().to_string();
    if text.is_empty() || text.chars().count() > MAX_ITEM_TEXT {
        return Err(StatusCode::BAD_REQUEST);
    }

    let added_by = req.added_by.trim().to_string();
    if added_by.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let now = chrono::Utc::now();
    let item = ShoppingItem {
        id,
        text: text.clone(),
        added_by: added_by.clone(),
        created_at: now,
        completed: false,
    };

    // Run blocking DB work off the async runtime
    let db = state.clone();
    let stamp = now.to_rfc3339();
    let existed = tokio::task::spawn_blocking(move || db.db.upsert_item(id, &text, &added_by, &stamp))
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Broadcast to all websocket clients
    let event = if existed {
        GatewayEvent::ItemUpdate { item: item.clone() }
    } else {
        GatewayEvent::ItemInsert { item: item.clone() }
    };
    state.dispatcher.broadcast(event);

    Ok(Json(item))
}

/// Flip the completion flag of an occupied slot. 404 when the slot has no
/// row: completing a non-existent item is not a thing, and the usual cause
/// is another member clearing the slot in the race window.
pub async fn toggle_item(
    State(state): State<Arc<AppStateInner>>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, StatusCode> {
    if id as usize >= SLOT_COUNT {
        return Err(StatusCode::BAD_REQUEST);
    }

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.toggle_item(id))
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let item = item_from_row(&row);
    state
        .dispatcher
        .broadcast(GatewayEvent::ItemUpdate { item: item.clone() });

    Ok(Json(item))
}

/// Remove a slot's row. Clearing an already-empty slot is a no-op, not an
/// error; an event goes out only when a row actually disappeared.
pub async fn clear_item(
    State(state): State<Arc<AppStateInner>>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, StatusCode> {
    if id as usize >= SLOT_COUNT {
        return Err(StatusCode::BAD_REQUEST);
    }

    let db = state.clone();
    let removed = tokio::task::spawn_blocking(move || db.db.delete_item(id))
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if removed {
        state.dispatcher.broadcast(GatewayEvent::ItemDelete { id });
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Remove every row. One ItemDelete goes out per removed row, so every
/// client converges through the same single-row reducer path it uses for
/// ordinary deletes.
pub async fn clear_all(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let ids = tokio::task::spawn_blocking(move || db.db.clear_items())
        .await
        .map_err(join_error)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let deleted = ids.len() as u32;
    for id in ids {
        state.dispatcher.broadcast(GatewayEvent::ItemDelete { id });
    }

    Ok(Json(ClearAllResponse { deleted }))
}

fn join_error(e: tokio::task::JoinError) -> StatusCode {
    error!("spawn_blocking join error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}
