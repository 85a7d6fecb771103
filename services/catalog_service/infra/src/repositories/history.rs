//! PostgreSQL implementation of the append-only price-history store
//! (spec §3, §4.4 phase 4, §4.6).

use async_trait::async_trait;
use catalog_service_core::domains::PriceHistoryEvent;
use catalog_service_core::repositories::HistoryRepository;
use chrono::{DateTime, Utc};
use shared_error::AppError;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(FromRow)]
struct HistoryRow {
    seq: i64,
    unit_id: Uuid,
    price: Option<i64>,
    date: DateTime<Utc>,
}

impl From<HistoryRow> for PriceHistoryEvent {
    fn from(row: HistoryRow) -> Self {
        PriceHistoryEvent { seq: row.seq, unit_id: row.unit_id, price: row.price, date: row.date }
    }
}

pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_id: Uuid,
        price: Option<i64>,
        date: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO price_history (unit_id, price, date) VALUES ($1, $2, $3)")
            .bind(unit_id)
            .bind(price)
            .bind(date)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn find_in_range(
        &self,
        unit_id: Uuid,
        date_start: DateTime<Utc>,
        date_end: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryEvent>, AppError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT seq, unit_id, price, date FROM price_history
            WHERE unit_id = $1 AND date >= $2 AND date < $3
            ORDER BY date ASC, seq ASC
            "#,
        )
        .bind(unit_id)
        .bind(date_start)
        .bind(date_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PriceHistoryEvent::from).collect())
    }

    async fn find_latest_per_offer_in_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryEvent>, AppError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT seq, unit_id, price, date FROM (
                SELECT DISTINCT ON (ph.unit_id) ph.seq, ph.unit_id, ph.price, ph.date
                FROM price_history ph
                JOIN units u ON u.id = ph.unit_id
                WHERE u.is_category = false
                ORDER BY ph.unit_id, ph.date DESC, ph.seq DESC
            ) latest
            WHERE date >= $1 AND date <= $2
            ORDER BY date DESC
            "#,
        )
        .bind(range_start)
        .bind(range_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PriceHistoryEvent::from).collect())
    }

    async fn delete_for_units(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_ids: &[Uuid],
    ) -> Result<(), AppError> {
        if unit_ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM price_history WHERE unit_id = ANY($1)")
            .bind(unit_ids)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
