//! Store-reading wrapper around the pure planning functions in
//! `catalog_service_core::services::planner` (spec §4.3).
//!
//! `PgUnitUpdatePlanner` fetches exactly the pre-images, aggregates, and
//! ancestor chains the pure functions need, then hands them off; it owns
//! no business logic of its own.

use async_trait::async_trait;
use catalog_service_core::domains::Unit;
use catalog_service_core::dto::ShopUnitImport;
use catalog_service_core::repositories::{AggregateRepository, HierarchyRepository, UnitRepository};
use catalog_service_core::services::plan::Plan;
use catalog_service_core::services::planner::{build_delete_plan, build_import_plan, ImportContext, UnitUpdatePlanner};
use chrono::{DateTime, Utc};
use shared_error::AppError;
use sqlx::{Postgres, Transaction};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub struct PgUnitUpdatePlanner {
    unit_repo: Arc<dyn UnitRepository>,
    aggregate_repo: Arc<dyn AggregateRepository>,
    hierarchy_repo: Arc<dyn HierarchyRepository>,
}

impl PgUnitUpdatePlanner {
    pub fn new(
        unit_repo: Arc<dyn UnitRepository>,
        aggregate_repo: Arc<dyn AggregateRepository>,
        hierarchy_repo: Arc<dyn HierarchyRepository>,
    ) -> Self {
        Self { unit_repo, aggregate_repo, hierarchy_repo }
    }
}

#[async_trait]
impl UnitUpdatePlanner for PgUnitUpdatePlanner {
    async fn plan_import(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch: &[ShopUnitImport],
        update_date: DateTime<Utc>,
    ) -> Result<Plan, AppError> {
        let item_ids: Vec<Uuid> = batch.iter().map(|item| item.id).collect();
        let preimages: HashMap<Uuid, Unit> = self
            .unit_repo
            .find_by_ids(tx, &item_ids)
            .await?
            .into_iter()
            .map(|unit| (unit.id, unit))
            .collect();

        let category_ids_in_batch: Vec<Uuid> =
            batch.iter().filter(|item| item.is_category()).map(|item| item.id).collect();
        let aggregates = self.aggregate_repo.find_many(tx, &category_ids_in_batch).await?;

        // Every parent id this batch references, new or old, needs its
        // ancestor chain resolved; batch-local categories are harmless
        // no-ops here since `resolve_ancestor_chain` prefers the local
        // chain whenever one exists.
        let mut parent_ref_ids: HashSet<Uuid> = HashSet::new();
        for item in batch {
            if let Some(parent_id) = item.parent_id {
                parent_ref_ids.insert(parent_id);
            }
            if let Some(old) = preimages.get(&item.id) {
                if let Some(parent_id) = old.parent_id {
                    parent_ref_ids.insert(parent_id);
                }
            }
        }
        let parent_ref_ids: Vec<Uuid> = parent_ref_ids.into_iter().collect();
        let external_ancestors = self.hierarchy_repo.ancestors(tx, &parent_ref_ids).await?;

        // A closure-table `ancestors` lookup can't tell "id is a root
        // category with zero ancestors" apart from "id does not exist at
        // all" — both yield an empty chain. Fetch the referenced parent
        // rows directly so the planner can validate existence and
        // `is_category` against real store state (spec §4.3's
        // dangling-parent / parent-must-be-a-category rule).
        let external_parents: HashMap<Uuid, Unit> = self
            .unit_repo
            .find_by_ids(tx, &parent_ref_ids)
            .await?
            .into_iter()
            .map(|unit| (unit.id, unit))
            .collect();

        let ctx = ImportContext {
            preimages: &preimages,
            aggregates: &aggregates,
            external_ancestors: &external_ancestors,
            external_parents: &external_parents,
        };
        build_import_plan(batch, update_date, &ctx)
    }

    async fn plan_delete(&self, tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<Plan, AppError> {
        let target = self
            .unit_repo
            .find_by_id(tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unit {id} not found")))?;

        let subtree_ids = self.unit_repo.find_subtree_ids(tx, id).await?;
        let subtree = self.unit_repo.find_by_ids(tx, &subtree_ids).await?;
        let own_aggregate =
            if target.is_category() { self.aggregate_repo.find_one(tx, id).await? } else { None };
        let ancestors = self.hierarchy_repo.ancestors(tx, &[id]).await?.remove(&id).unwrap_or_default();

        Ok(build_delete_plan(&target, &subtree, own_aggregate, &ancestors))
    }
}
