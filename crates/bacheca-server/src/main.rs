use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use bacheca_api::{AppState, AppStateInner};
use bacheca_gateway::dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bacheca=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let family_key = std::env::var("BACHECA_FAMILY_KEY").unwrap_or_else(|_| {
        warn!("BACHECA_FAMILY_KEY not set, using the development key");
        "famiglia-dev-key".into()
    });
    let db_path = std::env::var("BACHECA_DB_PATH").unwrap_or_else(|_| "bacheca.db".into());
    let host = std::env::var("BACHECA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("BACHECA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = bacheca_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let dispatcher = Dispatcher::new();
    let state: AppState = Arc::new(AppStateInner {
        db,
        dispatcher,
        family_key,
    });

    let app = bacheca_api::router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Bacheca server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
