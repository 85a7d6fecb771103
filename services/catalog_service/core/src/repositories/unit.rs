//! Store-adapter contract for the `Unit` table (spec §2 component 1).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domains::Unit;
use shared_error::AppError;

/// Get-by-id, upsert, delete, and range operations over units.
///
/// All mutating methods take the caller's transaction so the planner's
/// reads and the executor's writes for one request share one
/// serializable transaction (spec §5).
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Fetch the pre-images for a set of ids, within the given transaction
    /// so a batch sees a consistent snapshot of the store.
    async fn find_by_ids(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ids: &[Uuid],
    ) -> Result<Vec<Unit>, AppError>;

    async fn find_by_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Unit>, AppError>;

    /// Fetch a unit outside of any caller-managed transaction, for reads
    /// that don't participate in a mutation (e.g. `node(id)`).
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Unit>, AppError>;

    /// Direct children of `parent_id`, in a stable order.
    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Unit>, AppError>;

    /// Batch fetch outside any caller-managed transaction, for reads that
    /// don't participate in a mutation (e.g. `sales(date)` projecting a
    /// batch of offers it found via price history).
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Unit>, AppError>;

    /// Insert-or-update a unit row (phase 2 of the executor).
    async fn upsert(&self, tx: &mut Transaction<'_, Postgres>, unit: &Unit) -> Result<(), AppError>;

    /// Overwrite just `price`/`last_update` on an existing row (phase 3,
    /// applied to every ancestor whose aggregate changed).
    async fn update_price_and_last_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        price: Option<i64>,
        last_update: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Overwrite just `price`, leaving `last_update` untouched. Deletion
    /// has no client-supplied `updateDate` to stamp ancestors with
    /// (spec §4.5), but still recomputes their derived price.
    async fn update_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        price: Option<i64>,
    ) -> Result<(), AppError>;

    /// Every id in the transitive subtree rooted at `id`, including `id`
    /// itself. Used by deletion to cascade.
    async fn find_subtree_ids(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Vec<Uuid>, AppError>;

    /// Delete the given ids' rows. Used by deletion after hierarchy and
    /// history cleanup.
    async fn delete_many(&self, tx: &mut Transaction<'_, Postgres>, ids: &[Uuid]) -> Result<(), AppError>;
}
