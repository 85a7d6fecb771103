//! The orchestration surface the HTTP edge talks to: one mutating
//! operation per write endpoint, one read operation per read endpoint.

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::{ImportBatchRequest, SalesQuery, ShopUnit, StatUnitList, StatisticQuery};
use shared_error::AppError;

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// `POST /imports`: plan and execute a batch inside one transaction.
    async fn import(&self, batch: ImportBatchRequest) -> Result<(), AppError>;

    /// `DELETE /delete/{id}`: plan and execute a cascading delete.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// `GET /nodes/{id}`: subtree snapshot.
    async fn node(&self, id: Uuid) -> Result<ShopUnit, AppError>;

    /// `GET /node/{id}/statistic`: price history over `[dateStart, dateEnd)`.
    async fn statistic(&self, id: Uuid, query: StatisticQuery) -> Result<StatUnitList, AppError>;

    /// `GET /sales`: offers whose most recent event falls in
    /// `[date - 24h, date]`.
    async fn sales(&self, query: SalesQuery) -> Result<StatUnitList, AppError>;
}
