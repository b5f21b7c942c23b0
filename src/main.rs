use std::sync::Arc;

use notekeeper_api::config;
use notekeeper_api::server::{app, AppState};
use notekeeper_api::store::MemoryStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, PORT, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Notekeeper API in {:?} mode", config.environment);

    let state = AppState::new(Arc::new(MemoryStore::new()));
    let app = app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Notekeeper API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
