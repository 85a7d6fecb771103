//! Plan executor (spec §4.4): applies a `Plan` inside one transaction in
//! a fixed phase order.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::services::plan::Plan;
use shared_error::AppError;

#[async_trait]
pub trait PlanExecutor: Send + Sync {
    /// Apply `plan`'s hierarchy edits, then unit row upserts, then
    /// aggregate deltas, then history appends, in that order. Any
    /// failure must leave the transaction rollback-ready; the caller
    /// commits.
    async fn execute(&self, tx: &mut Transaction<'_, Postgres>, plan: Plan) -> Result<(), AppError>;
}
