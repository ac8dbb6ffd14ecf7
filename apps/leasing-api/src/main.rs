//! Leasing API server - contract document generation backend
//!
//! Provides REST endpoints for:
//! - Contract template management and live preview
//! - Document generation from templates
//! - Document version lineages and status workflow
//! - Category completeness reporting

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod models;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leasing_api=info".parse()?)
                .add_directive("contract_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing leasing API...");
    let state = Arc::new(AppState::new());

    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(TraceLayer::new_for_http()).layer(cors);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting leasing API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Templates
        .route(
            "/api/templates",
            post(handlers::create_template).get(handlers::list_templates),
        )
        .route(
            "/api/templates/:id",
            get(handlers::get_template).put(handlers::update_template),
        )
        .route("/api/templates/:id/default", post(handlers::set_default_template))
        .route("/api/templates/:id/preview", post(handlers::preview_template))
        // Documents
        .route("/api/documents", get(handlers::list_documents))
        .route("/api/documents/generate", post(handlers::generate_document))
        .route(
            "/api/documents/:id/versions",
            post(handlers::create_new_version),
        )
        .route("/api/documents/:id/latest", get(handlers::get_latest))
        .route(
            "/api/documents/:id/versions/:version",
            get(handlers::get_version),
        )
        .route("/api/documents/:id/status", post(handlers::transition_status))
        .route("/api/documents/:id/events", get(handlers::lineage_events))
        // Categories
        .route(
            "/api/categories",
            post(handlers::register_category).get(handlers::list_categories),
        )
        .route(
            "/api/categories/:category_type/completeness",
            get(handlers::category_completeness),
        )
        .with_state(state)
}
