//! Closure-table contract for the hierarchy index (spec §4.1).

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use shared_error::AppError;

#[async_trait]
pub trait HierarchyRepository: Send + Sync {
    /// For each id in `ids`, its ancestor category ids from immediate
    /// parent up to the root; order unimportant.
    async fn ancestors(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, AppError>;

    /// Insert `(parent_id, unit_id)` plus `(a, unit_id)` for every
    /// existing ancestor `a` of `parent_id`.
    async fn build(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<(), AppError>;

    /// Remove every edge whose ancestor or descendant lies in the
    /// subtree rooted at `category_id` (including the category itself).
    ///
    /// Used when a subtree is being removed entirely (deletion); unlike
    /// `rebuild`, this does not preserve the subtree's inner edges.
    async fn destroy(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_id: Uuid,
    ) -> Result<(), AppError>;

    /// Move `unit_id` (a category) and its existing subtree under
    /// `new_parent_id`: edges from ancestors outside the subtree into it
    /// are dropped and replaced with edges from `new_parent_id`'s own
    /// ancestor chain, while edges among the subtree's own members are
    /// left untouched (spec §4.1 `rebuild`).
    async fn rebuild(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> Result<(), AppError>;
}
