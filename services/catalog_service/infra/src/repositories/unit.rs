//! PostgreSQL implementation of the `Unit` table contract (spec §2
//! component 1, §3).

use async_trait::async_trait;
use catalog_service_core::domains::{Unit, UnitKind};
use catalog_service_core::repositories::UnitRepository;
use chrono::{DateTime, Utc};
use shared_error::AppError;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(FromRow)]
struct UnitRow {
    id: Uuid,
    name: String,
    parent_id: Option<Uuid>,
    is_category: bool,
    price: Option<i64>,
    last_update: DateTime<Utc>,
}

impl From<UnitRow> for Unit {
    fn from(row: UnitRow) -> Self {
        Unit {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
            kind: UnitKind::from_is_category(row.is_category),
            price: row.price,
            last_update: row.last_update,
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, parent_id, is_category, price, last_update";

pub struct PgUnitRepository {
    pool: PgPool,
}

impl PgUnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitRepository for PgUnitRepository {
    async fn find_by_ids(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ids: &[Uuid],
    ) -> Result<Vec<Unit>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<UnitRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM units WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.into_iter().map(Unit::from).collect())
    }

    async fn find_by_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Unit>, AppError> {
        let row: Option<UnitRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM units WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(Unit::from))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Unit>, AppError> {
        let row: Option<UnitRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM units WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Unit::from))
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Unit>, AppError> {
        let rows: Vec<UnitRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM units WHERE parent_id = $1 ORDER BY name, id"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Unit::from).collect())
    }

    async fn upsert(&self, tx: &mut Transaction<'_, Postgres>, unit: &Unit) -> Result<(), AppError> {
        // The `WHERE` clause on the conflict update is the executor's
        // second-line defense (spec §4.4 phase 2): if a row with this id
        // already exists with a different `is_category`, the conflicting
        // update is silently skipped by Postgres and `rows_affected`
        // comes back 0, which we turn into a hard reject below.
        let result = sqlx::query(
            r#"
            INSERT INTO units (id, name, parent_id, is_category, price, last_update)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                parent_id = EXCLUDED.parent_id,
                price = EXCLUDED.price,
                last_update = EXCLUDED.last_update
            WHERE units.is_category = EXCLUDED.is_category
            "#,
        )
        .bind(unit.id)
        .bind(&unit.name)
        .bind(unit.parent_id)
        .bind(unit.is_category())
        .bind(unit.price)
        .bind(unit.last_update)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "unit {} changes is_category from its stored value",
                unit.id
            )));
        }
        Ok(())
    }

    async fn update_price_and_last_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        price: Option<i64>,
        last_update: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE units SET price = $2, last_update = $3 WHERE id = $1")
            .bind(id)
            .bind(price)
            .bind(last_update)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Unit>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<UnitRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM units WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Unit::from).collect())
    }

    async fn update_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        price: Option<i64>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE units SET price = $2 WHERE id = $1")
            .bind(id)
            .bind(price)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn find_subtree_ids(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let mut ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT descendant_id FROM hierarchy_edges WHERE ancestor_id = $1",
        )
        .bind(id)
        .fetch_all(&mut **tx)
        .await?;
        ids.push(id);
        Ok(ids)
    }

    async fn delete_many(&self, tx: &mut Transaction<'_, Postgres>, ids: &[Uuid]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM units WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
