//! Unit update planner (spec §4.3): the core algorithm. `build_import_plan`
//! and `build_delete_plan` are pure functions over already-fetched store
//! state, so they can be unit tested without a database; the async
//! `UnitUpdatePlanner` trait (implemented in `infra`) is the thin
//! store-reading wrapper around them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

use validator::Validate;

use crate::domains::{AggregateDelta, CategoryAggregate, Unit, UnitKind};
use crate::dto::ShopUnitImport;
use crate::services::plan::{HierarchyBuild, Plan};
use shared_error::AppError;

#[async_trait]
pub trait UnitUpdatePlanner: Send + Sync {
    async fn plan_import(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch: &[ShopUnitImport],
        update_date: DateTime<Utc>,
    ) -> Result<Plan, AppError>;

    async fn plan_delete(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Plan, AppError>;
}

/// Resolves the ancestor-category chain for `start_parent`, splicing
/// batch-local category parent links (not yet in the store) together
/// with externally fetched chains for store-resident categories.
fn resolve_ancestor_chain(
    start_parent: Option<Uuid>,
    local_parent_of: &HashMap<Uuid, Option<Uuid>>,
    external_ancestors: &HashMap<Uuid, Vec<Uuid>>,
) -> Vec<Uuid> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = start_parent;
    while let Some(id) = current {
        if !seen.insert(id) {
            break; // defensive: a cycle should already have failed validation
        }
        chain.push(id);
        match local_parent_of.get(&id) {
            Some(next) => current = *next,
            None => {
                if let Some(rest) = external_ancestors.get(&id) {
                    chain.extend(rest.iter().copied());
                }
                break;
            },
        }
    }
    chain
}

/// Everything `build_import_plan` needs that only the store can answer.
pub struct ImportContext<'a> {
    /// Pre-existing units keyed by id, for ids that appear in the batch.
    pub preimages: &'a HashMap<Uuid, Unit>,
    /// Aggregates of categories in the batch whose parent changed
    /// (case F needs `(sum, count)` to move wholesale).
    pub aggregates: &'a HashMap<Uuid, CategoryAggregate>,
    /// Ancestor chains (from the closure table) for every store-resident
    /// parent id referenced directly or as an old parent by the batch.
    /// A closure-table lookup alone cannot distinguish "this id exists as
    /// a root category" from "this id does not exist at all" (both yield
    /// an empty chain), so existence is decided via `external_parents`
    /// instead — this map is only for walking ancestor chains.
    pub external_ancestors: &'a HashMap<Uuid, Vec<Uuid>>,
    /// Store-resident units for every parent id referenced by the batch
    /// that doesn't already appear in `preimages` (i.e. isn't itself a
    /// submitted item). Used to validate that a referenced parent both
    /// exists and is a category (spec §4.3's dangling-parent rule).
    pub external_parents: &'a HashMap<Uuid, Unit>,
}

pub fn build_import_plan(
    items: &[ShopUnitImport],
    update_date: DateTime<Utc>,
    ctx: &ImportContext<'_>,
) -> Result<Plan, AppError> {
    let mut seen_ids = HashSet::with_capacity(items.len());
    for item in items {
        item.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
        if !seen_ids.insert(item.id) {
            return Err(AppError::ValidationError(format!("duplicate id {} in batch", item.id)));
        }
    }

    let category_ids_in_batch: HashSet<Uuid> = items
        .iter()
        .filter(|i| i.is_category())
        .map(|i| i.id)
        .collect();

    // Structural + semantic validation against pre-images (spec §4.3).
    for item in items {
        if let Some(old) = ctx.preimages.get(&item.id) {
            if old.is_category() != item.is_category() {
                return Err(AppError::ValidationError(format!(
                    "unit {} changes is_category from {} to {}",
                    item.id,
                    old.is_category(),
                    item.is_category()
                )));
            }
        }

        match item.kind {
            UnitKind::Category => {
                if item.price.is_some() {
                    return Err(AppError::ValidationError(format!(
                        "category {} must not carry a price",
                        item.id
                    )));
                }
            },
            UnitKind::Offer => match item.price {
                None => {
                    return Err(AppError::ValidationError(format!(
                        "offer {} is missing a price",
                        item.id
                    )))
                },
                Some(p) if p < 0 => {
                    return Err(AppError::ValidationError(format!(
                        "offer {} has a negative price",
                        item.id
                    )))
                },
                Some(_) => {},
            },
        }

        if let Some(parent_id) = item.parent_id {
            let parent_exists_in_store = ctx.preimages.get(&parent_id).map(Unit::is_category).unwrap_or(false)
                || ctx.external_parents.get(&parent_id).map(Unit::is_category).unwrap_or(false);
            let parent_in_batch_as_category = category_ids_in_batch.contains(&parent_id);
            if !parent_exists_in_store && !parent_in_batch_as_category {
                return Err(AppError::ValidationError(format!(
                    "unit {} references unknown parent {}",
                    item.id, parent_id
                )));
            }
        }
    }

    // Cycle detection among batch-internal category parent links.
    let local_parent_of: HashMap<Uuid, Option<Uuid>> = items
        .iter()
        .filter(|i| i.is_category())
        .map(|i| (i.id, i.parent_id))
        .collect();
    for &id in local_parent_of.keys() {
        let mut current = Some(id);
        let mut hops = 0usize;
        while let Some(cur) = current {
            if cur == id && hops > 0 {
                return Err(AppError::ValidationError(format!(
                    "cycle detected in batch hierarchy through {}",
                    id
                )));
            }
            hops += 1;
            if hops > local_parent_of.len() + 1 {
                return Err(AppError::ValidationError("cycle detected in batch hierarchy".to_string()));
            }
            current = local_parent_of.get(&cur).copied().flatten();
        }
    }

    // Topological sort (spec §4.3): a batch-local category must be
    // upserted and `build`-ed before any item that names it as
    // `parent_id`, since the executor's unit-row FK and `build`'s
    // ancestor-chain copy both need the parent's row/edges to already
    // exist. Kahn's algorithm over the id graph; cycles were already
    // rejected above, so every item is guaranteed to drain from the
    // queue. Ties (independent items) keep their original relative
    // order, which is what makes the result independent of submission
    // order (spec §5) rather than dependent on it.
    let id_to_index: HashMap<Uuid, usize> = items.iter().enumerate().map(|(i, item)| (item.id, i)).collect();
    let mut in_degree = vec![0usize; items.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    for (i, item) in items.iter().enumerate() {
        if let Some(parent_id) = item.parent_id {
            if let Some(&j) = id_to_index.get(&parent_id) {
                in_degree[i] += 1;
                dependents[j].push(i);
            }
        }
    }
    let mut ready: VecDeque<usize> = (0..items.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(items.len());
    while let Some(i) = ready.pop_front() {
        order.push(i);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push_back(dependent);
            }
        }
    }

    let mut plan = Plan { update_date: Some(update_date), ..Plan::default() };

    for &index in &order {
        let item = &items[index];
        let old = ctx.preimages.get(&item.id);
        let new_unit = Unit {
            id: item.id,
            name: item.name.clone(),
            parent_id: item.parent_id,
            kind: item.kind,
            price: item.price,
            last_update: update_date,
        };

        match (old, item.kind) {
            // Case A: new offer.
            (None, UnitKind::Offer) => {
                plan.unit_upserts.push(new_unit);
                plan.history_unit_ids.insert(item.id);
                plan.hierarchy_builds
                    .push(HierarchyBuild { unit_id: item.id, parent_id: item.parent_id });
                let ancestors = resolve_ancestor_chain(item.parent_id, &local_parent_of, ctx.external_ancestors);
                plan.apply_ancestor_deltas(&ancestors, AggregateDelta::new(item.price.unwrap_or(0), 1));
            },
            // Case B: new category.
            (None, UnitKind::Category) => {
                plan.unit_upserts.push(new_unit);
                plan.new_categories.push(item.id);
                if item.parent_id.is_some() {
                    plan.hierarchy_builds
                        .push(HierarchyBuild { unit_id: item.id, parent_id: item.parent_id });
                }
                let ancestors = resolve_ancestor_chain(item.parent_id, &local_parent_of, ctx.external_ancestors);
                plan.touch_ancestors(&ancestors);
            },
            (Some(old), UnitKind::Offer) => {
                let parent_changed = old.parent_id != item.parent_id;
                let price_changed = old.price != item.price;
                plan.unit_upserts.push(new_unit);
                plan.history_unit_ids.insert(item.id);

                if parent_changed {
                    // Case E.
                    let old_ancestors =
                        resolve_ancestor_chain(old.parent_id, &local_parent_of, ctx.external_ancestors);
                    plan.apply_ancestor_deltas(
                        &old_ancestors,
                        AggregateDelta::new(-old.price.unwrap_or(0), -1),
                    );
                    plan.hierarchy_destroys.push(item.id);
                    let new_ancestors =
                        resolve_ancestor_chain(item.parent_id, &local_parent_of, ctx.external_ancestors);
                    plan.hierarchy_builds
                        .push(HierarchyBuild { unit_id: item.id, parent_id: item.parent_id });
                    plan.apply_ancestor_deltas(&new_ancestors, AggregateDelta::new(item.price.unwrap_or(0), 1));
                } else if price_changed {
                    // Case D.
                    let ancestors =
                        resolve_ancestor_chain(item.parent_id, &local_parent_of, ctx.external_ancestors);
                    let delta = item.price.unwrap_or(0) - old.price.unwrap_or(0);
                    plan.apply_ancestor_deltas(&ancestors, AggregateDelta::new(delta, 0));
                } else {
                    // Case C: touch last_update only, still one history event.
                    let ancestors =
                        resolve_ancestor_chain(item.parent_id, &local_parent_of, ctx.external_ancestors);
                    plan.touch_ancestors(&ancestors);
                }
            },
            (Some(old), UnitKind::Category) => {
                let parent_changed = old.parent_id != item.parent_id;
                plan.unit_upserts.push(new_unit);

                if parent_changed {
                    // Case F: move the category's whole aggregate.
                    let agg = ctx
                        .aggregates
                        .get(&item.id)
                        .copied()
                        .unwrap_or_else(|| CategoryAggregate::empty(item.id));
                    let old_ancestors =
                        resolve_ancestor_chain(old.parent_id, &local_parent_of, ctx.external_ancestors);
                    plan.apply_ancestor_deltas(&old_ancestors, AggregateDelta::new(-agg.sum, -agg.count));
                    let new_ancestors =
                        resolve_ancestor_chain(item.parent_id, &local_parent_of, ctx.external_ancestors);
                    plan.apply_ancestor_deltas(&new_ancestors, AggregateDelta::new(agg.sum, agg.count));
                    plan.hierarchy_moves
                        .push(HierarchyBuild { unit_id: item.id, parent_id: item.parent_id });
                } else {
                    // Case G: no price delta, only last_update.
                    let ancestors =
                        resolve_ancestor_chain(item.parent_id, &local_parent_of, ctx.external_ancestors);
                    plan.touch_ancestors(&ancestors);
                }
            },
        }
    }

    Ok(plan)
}

/// Planning for `DELETE /delete/{id}` (spec §4.5).
///
/// `subtree` contains every unit in the transitive subtree of `id`,
/// including `id` itself, in no particular order.
pub fn build_delete_plan(
    target: &Unit,
    subtree: &[Unit],
    own_aggregate: Option<CategoryAggregate>,
    ancestors: &[Uuid],
) -> Plan {
    let mut plan = Plan::default();

    let (delta_sum, delta_count) = if target.is_offer() {
        (-target.price.unwrap_or(0), -1)
    } else {
        let agg = own_aggregate.unwrap_or_else(|| CategoryAggregate::empty(target.id));
        (-agg.sum, -agg.count)
    };
    plan.apply_ancestor_deltas_silent(ancestors, AggregateDelta::new(delta_sum, delta_count));

    // Every unit (offer or category) has its own row in the closure table
    // as a descendant of its ancestors; `destroy` tears down all of those
    // edges regardless of kind, which a category-only guard here would
    // leave dangling and violate the FK on the subsequent `unit_deletes`.
    plan.hierarchy_destroys.push(target.id);

    let mut delete_ids: Vec<Uuid> = subtree.iter().map(|u| u.id).collect();
    if !delete_ids.contains(&target.id) {
        delete_ids.push(target.id);
    }
    plan.unit_deletes = delete_ids;

    plan
}
