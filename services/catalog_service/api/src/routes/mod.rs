//! Route definitions and router creation.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use catalog_service_infra::repositories::{PgAggregateRepository, PgHierarchyRepository, PgHistoryRepository, PgUnitRepository};
use catalog_service_infra::services::{CatalogServiceImpl, PgPlanExecutor, PgUnitUpdatePlanner};

use crate::handlers::{delete_unit, get_node, get_sales, get_statistic, import_units};
use crate::state::AppState;

/// Wire repositories into the planner/executor, then into `CatalogServiceImpl`,
/// and mount the five endpoints from spec §6.
pub fn create_router(pool: PgPool) -> Router {
    let unit_repo = Arc::new(PgUnitRepository::new(pool.clone()));
    let hierarchy_repo = Arc::new(PgHierarchyRepository::new(pool.clone()));
    let aggregate_repo = Arc::new(PgAggregateRepository::new(pool.clone()));
    let history_repo = Arc::new(PgHistoryRepository::new(pool.clone()));

    let planner = Arc::new(PgUnitUpdatePlanner::new(unit_repo.clone(), aggregate_repo.clone(), hierarchy_repo.clone()));
    let executor = Arc::new(PgPlanExecutor::new(unit_repo.clone(), hierarchy_repo, aggregate_repo, history_repo.clone()));

    let catalog_service = Arc::new(CatalogServiceImpl::new(pool, unit_repo, history_repo, planner, executor));

    let state = AppState { catalog_service };

    Router::new()
        .route("/imports", post(import_units))
        .route("/delete/{id}", delete(delete_unit))
        .route("/nodes/{id}", get(get_node))
        .route("/node/{id}/statistic", get(get_statistic))
        .route("/sales", get(get_sales))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
