//! Application state shared across all catalog HTTP handlers.

use std::sync::Arc;

use catalog_service_core::services::CatalogService;

/// The one thing every handler needs: the orchestration surface that
/// turns a request into a planned-and-executed mutation or a read.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<dyn CatalogService>,
}
