//! `CatalogServiceImpl`: the orchestration surface the HTTP edge talks to
//! (spec §2 components 4-6 wired together). Each mutating method opens
//! one transaction, hands it to the planner then the executor, and
//! commits; each reader bypasses the planner entirely.

use async_trait::async_trait;
use catalog_service_core::domains::{Unit, UnitNode};
use catalog_service_core::dto::{ImportBatchRequest, SalesQuery, ShopUnit, StatUnit, StatUnitList, StatisticQuery};
use catalog_service_core::repositories::{HistoryRepository, UnitRepository};
use catalog_service_core::services::catalog::CatalogService;
use catalog_service_core::services::executor::PlanExecutor;
use catalog_service_core::services::planner::UnitUpdatePlanner;
use chrono::{DateTime, Duration, Utc};
use shared_error::AppError;
use sqlx::PgPool;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

pub struct CatalogServiceImpl {
    pool: PgPool,
    unit_repo: Arc<dyn UnitRepository>,
    history_repo: Arc<dyn HistoryRepository>,
    planner: Arc<dyn UnitUpdatePlanner>,
    executor: Arc<dyn PlanExecutor>,
}

impl CatalogServiceImpl {
    pub fn new(
        pool: PgPool,
        unit_repo: Arc<dyn UnitRepository>,
        history_repo: Arc<dyn HistoryRepository>,
        planner: Arc<dyn UnitUpdatePlanner>,
        executor: Arc<dyn PlanExecutor>,
    ) -> Self {
        Self { pool, unit_repo, history_repo, planner, executor }
    }

    /// Iterative breadth-first subtree materialization so reading a
    /// deeply nested catalog never recurses on the stack (spec §5:
    /// implementations must tolerate depths in the tens of thousands).
    async fn build_subtree(&self, root: Unit) -> Result<UnitNode, AppError> {
        let root_id = root.id;
        let mut discovery_order = vec![root_id];
        let mut units: HashMap<Uuid, Unit> = HashMap::new();
        let mut children_of: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        units.insert(root_id, root);

        let mut queue: VecDeque<Uuid> = VecDeque::new();
        queue.push_back(root_id);

        while let Some(current_id) = queue.pop_front() {
            if !units[&current_id].is_category() {
                continue;
            }
            let kids = self.unit_repo.find_children(current_id).await?;
            let mut kid_ids = Vec::with_capacity(kids.len());
            for kid in kids {
                let kid_id = kid.id;
                kid_ids.push(kid_id);
                discovery_order.push(kid_id);
                units.insert(kid_id, kid);
                queue.push_back(kid_id);
            }
            children_of.insert(current_id, kid_ids);
        }

        // Assemble bottom-up: every child was discovered strictly after
        // its parent, so walking discovery order in reverse guarantees a
        // node's children are already built by the time we reach it.
        let mut built: HashMap<Uuid, UnitNode> = HashMap::new();
        for id in discovery_order.into_iter().rev() {
            let unit = units.remove(&id).expect("discovered unit must have been recorded");
            let children = if unit.is_category() {
                let kid_ids = children_of.remove(&id).unwrap_or_default();
                Some(
                    kid_ids
                        .into_iter()
                        .map(|kid_id| built.remove(&kid_id).expect("child built before its parent"))
                        .collect(),
                )
            } else {
                None
            };
            built.insert(id, UnitNode { unit, children });
        }

        Ok(built.remove(&root_id).expect("root built last"))
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn import(&self, batch: ImportBatchRequest) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let plan = self.planner.plan_import(&mut tx, &batch.items, batch.update_date).await?;
        self.executor.execute(&mut tx, plan).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let plan = self.planner.plan_delete(&mut tx, id).await?;
        self.executor.execute(&mut tx, plan).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn node(&self, id: Uuid) -> Result<ShopUnit, AppError> {
        let root = self
            .unit_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unit {id} not found")))?;
        let tree = self.build_subtree(root).await?;
        Ok(ShopUnit::from(tree))
    }

    async fn statistic(&self, id: Uuid, query: StatisticQuery) -> Result<StatUnitList, AppError> {
        let unit = self
            .unit_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unit {id} not found")))?;

        let start = query.date_start.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = query.date_end.unwrap_or(DateTime::<Utc>::MAX_UTC);
        if start >= end {
            return Err(AppError::ValidationError("dateStart must be strictly before dateEnd".to_string()));
        }

        let events = self.history_repo.find_in_range(id, start, end).await?;
        let items = events.iter().map(|event| StatUnit::from_event(&unit, event)).collect();
        Ok(StatUnitList { items })
    }

    async fn sales(&self, query: SalesQuery) -> Result<StatUnitList, AppError> {
        let range_end = query.date;
        let range_start = range_end - Duration::hours(24);
        let events = self.history_repo.find_latest_per_offer_in_range(range_start, range_end).await?;

        let unit_ids: Vec<Uuid> = events.iter().map(|event| event.unit_id).collect();
        let units: HashMap<Uuid, Unit> =
            self.unit_repo.find_many(&unit_ids).await?.into_iter().map(|unit| (unit.id, unit)).collect();

        let items = events
            .iter()
            .filter_map(|event| units.get(&event.unit_id).map(|unit| StatUnit::from_event(unit, event)))
            .collect();
        Ok(StatUnitList { items })
    }
}
