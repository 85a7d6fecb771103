//! Service trait definitions: pure interfaces, no implementations.
//!
//! `planner`/`plan` describe the unit update planner (spec §4.3),
//! `executor` the plan executor (spec §4.4), and `catalog` the
//! orchestration surface the HTTP edge talks to directly.

pub mod catalog;
pub mod executor;
pub mod plan;
pub mod planner;

pub use catalog::CatalogService;
pub use executor::PlanExecutor;
pub use plan::{HierarchyBuild, Plan};
pub use planner::{build_delete_plan, build_import_plan, ImportContext, UnitUpdatePlanner};
