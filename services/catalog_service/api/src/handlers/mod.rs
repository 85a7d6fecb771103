//! Axum handlers for the five catalog endpoints (spec §6).

use axum::extract::State;
use axum::Json;

use catalog_service_core::dto::{ImportBatchRequest, SalesQuery, ShopUnit, StatUnitList, StatisticQuery};
use shared_error::AppError;

use crate::extractors::{IdPath, ValidJson, ValidQuery};
use crate::state::AppState;

/// `POST /imports`
pub async fn import_units(
    State(state): State<AppState>,
    ValidJson(batch): ValidJson<ImportBatchRequest>,
) -> Result<(), AppError> {
    state.catalog_service.import(batch).await
}

/// `DELETE /delete/{id}`
pub async fn delete_unit(State(state): State<AppState>, IdPath(id): IdPath) -> Result<(), AppError> {
    state.catalog_service.delete(id).await
}

/// `GET /nodes/{id}`
pub async fn get_node(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ShopUnit>, AppError> {
    let node = state.catalog_service.node(id).await?;
    Ok(Json(node))
}

/// `GET /node/{id}/statistic`
pub async fn get_statistic(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidQuery(query): ValidQuery<StatisticQuery>,
) -> Result<Json<StatUnitList>, AppError> {
    let list = state.catalog_service.statistic(id, query).await?;
    Ok(Json(list))
}

/// `GET /sales`
pub async fn get_sales(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<SalesQuery>,
) -> Result<Json<StatUnitList>, AppError> {
    let list = state.catalog_service.sales(query).await?;
    Ok(Json(list))
}
