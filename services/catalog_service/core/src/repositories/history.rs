//! Append-only store contract for price history (spec §3, §4.4 phase 4).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domains::PriceHistoryEvent;
use shared_error::AppError;

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_id: Uuid,
        price: Option<i64>,
        date: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Events for `unit_id` with `date` in `[date_start, date_end)`,
    /// ordered oldest first.
    async fn find_in_range(
        &self,
        unit_id: Uuid,
        date_start: DateTime<Utc>,
        date_end: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryEvent>, AppError>;

    /// The most recent event's `(unit_id, event)` for every offer whose
    /// latest event falls in `[date - 24h, date]`.
    async fn find_latest_per_offer_in_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryEvent>, AppError>;

    /// Delete every event belonging to the given units (cascades with
    /// deletion).
    async fn delete_for_units(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit_ids: &[Uuid],
    ) -> Result<(), AppError>;
}
