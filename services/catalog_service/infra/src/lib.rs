//! Catalog Service Infrastructure
//!
//! `sqlx`/PostgreSQL implementations of the repository and service traits
//! defined in `catalog_service_core`, plus the planner/executor business
//! logic (spec §2 components 2-6).
//!
//! ## Architecture
//!
//! - `repositories/`: PostgreSQL implementations of the store-adapter
//!   contracts (units, hierarchy closure table, category aggregates,
//!   price history).
//! - `services/`: the planner's store-reading wrapper, the plan
//!   executor, and the `CatalogService` orchestration surface.

pub mod repositories;
pub mod services;

pub use repositories::{PgAggregateRepository, PgHierarchyRepository, PgHistoryRepository, PgUnitRepository};
pub use services::{CatalogServiceImpl, PgPlanExecutor, PgUnitUpdatePlanner};
