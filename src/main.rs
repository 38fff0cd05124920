use std::sync::Arc;

use anyhow::Context;
use url::Url;

use marketplace_api::images::{HttpImageUploader, ImageUploader, PassthroughUploader};
use marketplace_api::state::AppState;
use marketplace_api::store::memory::MemoryStore;
use marketplace_api::{app, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, PORT, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    tracing_subscriber::fmt::init();
    tracing::info!("Starting marketplace API in {:?} mode", config.environment);

    // Store and uploader handles are built once here and passed down; nothing
    // reaches for ambient connections.
    let store = Arc::new(MemoryStore::new());
    let uploader: Arc<dyn ImageUploader> = match &config.uploads.endpoint {
        Some(endpoint) => {
            let endpoint = Url::parse(endpoint).context("invalid UPLOADS_ENDPOINT")?;
            Arc::new(HttpImageUploader::new(endpoint, config.uploads.folder.clone()))
        }
        None => {
            tracing::warn!("no upload endpoint configured; images pass through unmodified");
            Arc::new(PassthroughUploader)
        }
    };
    let state = AppState { users: store.clone(), products: store, uploader };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("listening on http://{bind_addr}");

    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}
