//! Plan executor (spec §4.4): applies a `Plan` inside the caller's
//! transaction in the fixed phase order hierarchy → unit rows →
//! aggregates → history, plus the deletion cascade §4.5 folds into the
//! hierarchy/unit-row phases.

use async_trait::async_trait;
use catalog_service_core::domains::CategoryAggregate;
use catalog_service_core::repositories::{AggregateRepository, HierarchyRepository, HistoryRepository, UnitRepository};
use catalog_service_core::services::executor::PlanExecutor;
use catalog_service_core::services::plan::Plan;
use shared_error::AppError;
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct PgPlanExecutor {
    unit_repo: Arc<dyn UnitRepository>,
    hierarchy_repo: Arc<dyn HierarchyRepository>,
    aggregate_repo: Arc<dyn AggregateRepository>,
    history_repo: Arc<dyn HistoryRepository>,
}

impl PgPlanExecutor {
    pub fn new(
        unit_repo: Arc<dyn UnitRepository>,
        hierarchy_repo: Arc<dyn HierarchyRepository>,
        aggregate_repo: Arc<dyn AggregateRepository>,
        history_repo: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self { unit_repo, hierarchy_repo, aggregate_repo, history_repo }
    }
}

#[async_trait]
impl PlanExecutor for PgPlanExecutor {
    async fn execute(&self, tx: &mut Transaction<'_, Postgres>, plan: Plan) -> Result<(), AppError> {
        // Phase 1: hierarchy edits. Full subtree teardown (deletion, and
        // leaf offer moves where there is no inner structure to lose)
        // happens before the structure-preserving category moves.
        for category_id in &plan.hierarchy_destroys {
            self.hierarchy_repo.destroy(tx, *category_id).await?;
        }
        for mv in &plan.hierarchy_moves {
            self.hierarchy_repo.rebuild(tx, mv.unit_id, mv.parent_id).await?;
        }
        for build in &plan.hierarchy_builds {
            self.hierarchy_repo.build(tx, build.unit_id, build.parent_id).await?;
        }

        // Deletion cascade: a unit's aggregate, history, and row are
        // removed once the hierarchy no longer points at it.
        if !plan.unit_deletes.is_empty() {
            self.aggregate_repo.delete_many(tx, &plan.unit_deletes).await?;
            self.history_repo.delete_for_units(tx, &plan.unit_deletes).await?;
            self.unit_repo.delete_many(tx, &plan.unit_deletes).await?;
        }

        // Phase 2: unit row upserts, including the empty aggregate row a
        // newly created category is born with.
        for unit in &plan.unit_upserts {
            self.unit_repo.upsert(tx, unit).await?;
        }
        for category_id in &plan.new_categories {
            self.aggregate_repo.insert_empty(tx, *category_id).await?;
        }

        // Phase 3: aggregate deltas, additive per ancestor, then the
        // derived price/last_update written back onto the unit row.
        // `final_prices` doubles as the source of truth phase 4 reads
        // from, seeded here with the categories' freshly derived means.
        let mut final_prices: HashMap<Uuid, Option<i64>> =
            plan.unit_upserts.iter().map(|unit| (unit.id, unit.price)).collect();

        if !plan.aggregate_deltas.is_empty() {
            let ids: Vec<Uuid> = plan.aggregate_deltas.keys().copied().collect();
            let mut existing = self.aggregate_repo.find_many(tx, &ids).await?;

            for (category_id, delta) in &plan.aggregate_deltas {
                let mut aggregate = existing
                    .remove(category_id)
                    .unwrap_or_else(|| CategoryAggregate::empty(*category_id));
                aggregate.apply_delta(*delta);
                self.aggregate_repo.upsert(tx, &aggregate).await?;

                let mean = aggregate.mean();
                match plan.update_date {
                    Some(update_date) => {
                        self.unit_repo
                            .update_price_and_last_update(tx, *category_id, mean, update_date)
                            .await?;
                    },
                    None => {
                        self.unit_repo.update_price(tx, *category_id, mean).await?;
                    },
                }
                final_prices.insert(*category_id, mean);
            }
        }

        // Phase 4: one deduplicated history event per affected unit,
        // dated the batch's `updateDate`. Deletion has no `updateDate`
        // and leaves `history_unit_ids` empty, so this is a no-op then.
        if let Some(update_date) = plan.update_date {
            for unit_id in &plan.history_unit_ids {
                let price = final_prices.get(unit_id).copied().flatten();
                self.history_repo.append(tx, *unit_id, price, update_date).await?;
            }
        }

        Ok(())
    }
}
