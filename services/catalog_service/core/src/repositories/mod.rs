//! Repository traits: the store-adapter contract (spec §2 component 1).
//!
//! Each trait is implemented against PostgreSQL in the `infra` crate.
//! Mutating methods take a caller-managed `sqlx::Transaction` so a whole
//! request's planner reads and executor writes share one serializable
//! transaction.

pub mod aggregate;
pub mod hierarchy;
pub mod history;
pub mod unit;

pub use aggregate::AggregateRepository;
pub use hierarchy::HierarchyRepository;
pub use history::HistoryRepository;
pub use unit::UnitRepository;
