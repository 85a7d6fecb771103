//! Request/response bodies for the HTTP edge.

pub mod import;
pub mod node;
pub mod query;
pub mod stat;

pub use import::{ImportBatchRequest, ShopUnitImport};
pub use node::ShopUnit;
pub use query::{SalesQuery, StatisticQuery};
pub use stat::{StatUnit, StatUnitList};
