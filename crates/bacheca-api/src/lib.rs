pub mod middleware;
pub mod notes;
mod rows;
pub mod shopping;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, WebSocketUpgrade},
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bacheca_db::Database;
use bacheca_gateway::connection;
use bacheca_gateway::dispatcher::Dispatcher;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub dispatcher: Dispatcher,
    pub family_key: String,
}

/// Build the full application router: the REST surface behind the shared
/// family key, the websocket gateway, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/shopping/items",
            get(shopping::get_items).delete(shopping::clear_all),
        )
        .route(
            "/shopping/items/{id}",
            put(shopping::write_item).delete(shopping::clear_item),
        )
        .route("/shopping/items/{id}/toggle", post(shopping::toggle_item))
        .route("/notes", get(notes::get_notes).post(notes::create_note))
        .route("/notes/{id}", delete(notes::delete_note))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_family_key,
        ))
        .with_state(state.clone());

    let ws_route = Router::new()
        .route("/gateway", get(ws_upgrade))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(ws_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct GatewayQuery {
    key: Option<String>,
}

/// Browsers cannot attach headers to a websocket connect, so the family key
/// rides a query parameter here; the connection itself is pre-authenticated
/// by the time the upgrade completes.
async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<GatewayQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    if query.key.as_deref() != Some(state.family_key.as_str()) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let dispatcher = state.dispatcher.clone();
    Ok(ws.on_upgrade(move |socket| connection::handle_connection(socket, dispatcher)))
}
