//! Store contract for the per-category `(sum, count)` aggregate (spec §4.2).

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domains::CategoryAggregate;
use shared_error::AppError;

#[async_trait]
pub trait AggregateRepository: Send + Sync {
    async fn find_many(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CategoryAggregate>, AppError>;

    async fn find_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_id: Uuid,
    ) -> Result<Option<CategoryAggregate>, AppError>;

    /// Created together with a new category unit, at `sum = count = 0`.
    async fn insert_empty(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_id: Uuid,
    ) -> Result<(), AppError>;

    /// Overwrite the stored `(sum, count)` for a category.
    async fn upsert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        aggregate: &CategoryAggregate,
    ) -> Result<(), AppError>;

    /// Destroyed together with its category unit.
    async fn delete_many(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_ids: &[Uuid],
    ) -> Result<(), AppError>;
}
