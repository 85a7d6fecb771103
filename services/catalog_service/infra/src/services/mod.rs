//! `sqlx`-backed implementations of the service traits defined in
//! `catalog_service_core::services`: the planner's store-reading
//! wrapper, the plan executor, and the `CatalogService` orchestration
//! surface that wires both together with the repositories.

pub mod catalog;
pub mod executor;
pub mod planner;

pub use catalog::CatalogServiceImpl;
pub use executor::PgPlanExecutor;
pub use planner::PgUnitUpdatePlanner;
