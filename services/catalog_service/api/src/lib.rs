//! Catalog Service API
//!
//! HTTP handlers and routing for the catalog ingestion-and-analytics
//! service (spec §6).
//!
//! ## Architecture
//!
//! - `handlers/`: Axum HTTP handlers for the five endpoints.
//! - `extractors.rs`: path/query extractors shaping malformed-input
//!   rejections into the spec's `{code, message}` error body.
//! - `routes/`: router assembly and dependency wiring.
//! - `state.rs`: shared application state.

pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;

use axum::Router;
use shared_config::Config;
use shared_db::init_pool;

/// Build the full app, including database pool initialization. Used by
/// integration tests and by `main`.
pub async fn create_app(config: &Config) -> Router {
    let pool = init_pool(&config.database_url, config.max_connections)
        .await
        .expect("failed to initialize database pool");
    create_router(pool)
}
