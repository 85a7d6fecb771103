//! The plan produced by the unit update planner (spec §2 component 4) and
//! consumed by the plan executor (spec §4.4) in one fixed phase order.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::domains::{AggregateDelta, Unit};

/// A hierarchy `build(u)` step: give `unit_id` the parent `parent_id`
/// (absent for a root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyBuild {
    pub unit_id: Uuid,
    pub parent_id: Option<Uuid>,
}

/// Everything the executor needs to apply one request's mutation.
///
/// Fields map directly onto spec §4.4's four phases:
/// `hierarchy_destroys`/`hierarchy_builds` → phase 1,
/// `unit_upserts` → phase 2, `aggregate_deltas` → phase 3,
/// `history_unit_ids` → phase 4.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub hierarchy_destroys: Vec<Uuid>,
    pub hierarchy_builds: Vec<HierarchyBuild>,
    /// Category reparents (case F): preserve the moved subtree's inner
    /// edges instead of tearing the whole subtree down (spec §4.1
    /// `rebuild`, as opposed to `hierarchy_destroys` + `hierarchy_builds`
    /// which is correct only for leaves).
    pub hierarchy_moves: Vec<HierarchyBuild>,
    pub unit_upserts: Vec<Unit>,
    /// Newly created category ids (case B) needing an empty `(0, 0)`
    /// aggregate row inserted alongside their unit row.
    pub new_categories: Vec<Uuid>,
    /// Per-ancestor additive delta. An entry with a zero delta still
    /// means the ancestor's `last_update` must bump to the batch date
    /// (invariant 5) and still yields a phase-4 history event.
    pub aggregate_deltas: HashMap<Uuid, AggregateDelta>,
    /// Units (offers touched directly, plus every ancestor in
    /// `aggregate_deltas`) needing one deduplicated history event each.
    pub history_unit_ids: HashSet<Uuid>,
    /// Ids whose rows (and aggregate, if a category) must be deleted
    /// after hierarchy/aggregate bookkeeping, in deletion order. Their
    /// history is deleted too, regardless of `update_date`.
    pub unit_deletes: Vec<Uuid>,
    /// The batch's shared `updateDate`. `None` for a delete plan, which
    /// has no client-supplied date: deletion still recomputes every
    /// affected ancestor's `(sum, count)` via `aggregate_deltas`, but
    /// leaves `last_update` and history alone (spec §4.5).
    pub update_date: Option<DateTime<Utc>>,
}

impl Plan {
    /// Record a price-affecting delta on `ancestor_id` and mark it for a
    /// `last_update` bump and a new history event.
    pub fn add_ancestor_delta(&mut self, ancestor_id: Uuid, delta: AggregateDelta) {
        *self.aggregate_deltas.entry(ancestor_id).or_default() += delta;
        self.history_unit_ids.insert(ancestor_id);
    }

    pub fn touch_ancestors(&mut self, ancestor_ids: &[Uuid]) {
        for &id in ancestor_ids {
            self.aggregate_deltas.entry(id).or_default();
            self.history_unit_ids.insert(id);
        }
    }

    pub fn apply_ancestor_deltas(&mut self, ancestor_ids: &[Uuid], delta: AggregateDelta) {
        for &id in ancestor_ids {
            self.add_ancestor_delta(id, delta);
        }
    }

    /// Record a delta with no `last_update`/history side effect, because
    /// there is no `updateDate` to stamp them with (deletion).
    pub fn apply_ancestor_deltas_silent(&mut self, ancestor_ids: &[Uuid], delta: AggregateDelta) {
        for &id in ancestor_ids {
            *self.aggregate_deltas.entry(id).or_default() += delta;
        }
    }
}
