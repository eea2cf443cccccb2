use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use microblog_api::api::{self, AppState};
use microblog_api::auth::ApiKeyResolver;
use microblog_api::config::Config;
use microblog_api::db::init_database;
use microblog_api::media_store::LocalMediaStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,microblog_api=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::get();
    info!("Initialized configuration");

    // Initialize database
    let db = Arc::new(init_database().await?);
    info!("Connected to database");

    let state = AppState {
        identity: Arc::new(ApiKeyResolver::new(db.get_pool().clone())),
        blobs: Arc::new(LocalMediaStore::new(&config.media.root)),
        db,
    };

    api::start_api_server(state).await?;

    info!("Microblog API shutdown complete");
    Ok(())
}
