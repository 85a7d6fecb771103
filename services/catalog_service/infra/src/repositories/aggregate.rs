//! PostgreSQL implementation of the per-category `(sum, count)`
//! aggregate store (spec §4.2).

use async_trait::async_trait;
use catalog_service_core::domains::CategoryAggregate;
use catalog_service_core::repositories::AggregateRepository;
use shared_error::AppError;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(FromRow)]
struct AggregateRow {
    category_id: Uuid,
    sum: i64,
    count: i64,
}

impl From<AggregateRow> for CategoryAggregate {
    fn from(row: AggregateRow) -> Self {
        CategoryAggregate { category_id: row.category_id, sum: row.sum, count: row.count }
    }
}

pub struct PgAggregateRepository {
    #[allow(dead_code)]
    pool: PgPool,
}

impl PgAggregateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregateRepository for PgAggregateRepository {
    async fn find_many(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CategoryAggregate>, AppError> {
        if category_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<AggregateRow> = sqlx::query_as(
            "SELECT category_id, sum, count FROM category_aggregates WHERE category_id = ANY($1)",
        )
        .bind(category_ids)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.into_iter().map(|r| (r.category_id, CategoryAggregate::from(r))).collect())
    }

    async fn find_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_id: Uuid,
    ) -> Result<Option<CategoryAggregate>, AppError> {
        let row: Option<AggregateRow> = sqlx::query_as(
            "SELECT category_id, sum, count FROM category_aggregates WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(CategoryAggregate::from))
    }

    async fn insert_empty(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO category_aggregates (category_id, sum, count) VALUES ($1, 0, 0) \
             ON CONFLICT DO NOTHING",
        )
        .bind(category_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn upsert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        aggregate: &CategoryAggregate,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO category_aggregates (category_id, sum, count)
            VALUES ($1, $2, $3)
            ON CONFLICT (category_id) DO UPDATE SET sum = EXCLUDED.sum, count = EXCLUDED.count
            "#,
        )
        .bind(aggregate.category_id)
        .bind(aggregate.sum)
        .bind(aggregate.count)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn delete_many(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category_ids: &[Uuid],
    ) -> Result<(), AppError> {
        if category_ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM category_aggregates WHERE category_id = ANY($1)")
            .bind(category_ids)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
