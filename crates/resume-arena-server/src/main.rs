//! Resume Arena Server
//!
//! Axum web server exposing the rating engine over REST:
//! - resume registration and owner queries
//! - weighted random pair selection for voting
//! - vote resolution with atomic rating updates
//! - the ranked leaderboard and per-resume rating history

mod api;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use resume_arena::config::ArenaConfig;
use resume_arena::db::{self, DbPool};
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection handle.
    pub db: DbPool,
    /// Arena configuration, including the rating engine parameters.
    pub config: Arc<ArenaConfig>,
}

/// Health check endpoint.
///
/// Returns "ok" to indicate the server is running.
async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Arc::new(ArenaConfig::load()?);
    if let Some(data_dir) = config.database.parent() {
        std::fs::create_dir_all(data_dir)?;
    }

    let db = db::init_db(&config.database)?;
    let state = AppState {
        db,
        config: config.clone(),
    };

    // CORS layer for cross-origin requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/resumes", post(api::resumes::create_resume))
        .route("/api/resumes/mine", get(api::resumes::list_mine))
        .route("/api/resumes/random", get(api::resumes::random_resume))
        .route("/api/resumes/pair", get(api::resumes::get_pair))
        .route("/api/resumes/vote", post(api::vote::record_vote))
        .route(
            "/api/resumes/leaderboard",
            get(api::leaderboard::get_leaderboard),
        )
        .route("/api/resumes/:id", get(api::resumes::get_resume))
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::timing_layer))
        .layer(cors);

    let addr: SocketAddr = config.bind.parse()?;
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let result = health().await;
        assert_eq!(result, "ok");
    }
}
