//! Domain entities: the catalog's unit tree, its aggregates, hierarchy
//! closure table, and price history.

pub mod aggregate;
pub mod hierarchy;
pub mod history;
pub mod unit;

pub use aggregate::{AggregateDelta, CategoryAggregate};
pub use hierarchy::HierarchyEdge;
pub use history::PriceHistoryEvent;
pub use unit::{Unit, UnitKind, UnitNode};
