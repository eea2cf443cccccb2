mod extract;
mod handlers;

pub use extract::{ApiKey, API_KEY_HEADER};

use crate::auth::IdentityResolver;
use crate::config::Config;
use crate::db::Database;
use crate::media_store::BlobStore;
use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Upload size cap for media bodies.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared handler state: the pool plus the identity and blob capabilities.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub identity: Arc<dyn IdentityResolver>,
    pub blobs: Arc<dyn BlobStore>,
}

/// Build the application router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        // Tweet routes
        .route(
            "/api/tweets",
            get(handlers::tweets::list_tweets).post(handlers::tweets::create_tweet),
        )
        .route("/api/tweets/:tweet_id", delete(handlers::tweets::delete_tweet))
        .route(
            "/api/tweets/:tweet_id/likes",
            post(handlers::tweets::like_tweet).delete(handlers::tweets::unlike_tweet),
        )
        // User routes
        .route("/api/users/me", get(handlers::users::get_current_user))
        .route("/api/users/:user_id", get(handlers::users::get_user))
        .route(
            "/api/users/:user_id/follow",
            post(handlers::users::follow_user).delete(handlers::users::unfollow_user),
        )
        // Media routes
        .route("/api/medias", post(handlers::media::upload_media))
        .route("/media/:user_id/:file_name", get(handlers::media::get_media_file))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Start the API server
pub async fn start_api_server(state: AppState) -> Result<()> {
    let config = Config::get();

    // Set up CORS
    let cors = if config.server.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Get bind address
    let addr = format!("{}:{}", config.server.host, config.server.port).parse::<SocketAddr>()?;

    // Start server
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping API server"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
