//! Cycling Log Server - Main Application Entry Point
//!
//! This is the backend REST API for a cycling-activity logging application. Clients manage accounts, upload cycling session records, and attach bulk GPS traces to those records through a capability-key handshake.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: per-request credentials in the JSON body; GPS uploads authenticate with the capability key issued at record upload
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use tracing_subscriber::EnvFilter;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Every API endpoint is POST with credentials (or the capability key)
    // carried in the JSON body, so authentication happens inside the
    // handlers rather than in a header-based middleware layer.
    let app = Router::new()
        // Account management
        .route("/account/create", post(handlers::account::create_account))
        .route("/account/delete", post(handlers::account::delete_account))
        // Cycling records
        .route("/record/upload", post(handlers::record::upload_record))
        .route("/record/download", post(handlers::record::download_records))
        .route("/record/delete", post(handlers::record::delete_record))
        // GPS traces
        .route("/gps/upload", post(handlers::gps::upload_gps_data))
        .route("/gps/download", post(handlers::gps::download_gps_data))
        .route("/gps/invalidate-key", post(handlers::gps::invalidate_key))
        // Liveness probe (no authentication)
        .route("/health", get(handlers::health::health_check))
        // Add request tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
