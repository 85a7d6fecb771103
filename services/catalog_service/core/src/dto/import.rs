//! `POST /imports` request body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domains::UnitKind;

/// One submitted unit descriptor, as it appears on the wire.
///
/// Structural validation (non-empty name) happens here via `validator`;
/// the cross-referential rules from spec §4.3 (duplicate id within the
/// batch, type change, category-with-price, offer-without-price, dangling
/// parent) require the store's pre-images and are enforced by the planner.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ShopUnitImport {
    pub id: Uuid,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    pub price: Option<i64>,
}

impl ShopUnitImport {
    pub fn is_category(&self) -> bool {
        self.kind.is_category()
    }
}

/// The whole `/imports` request: a batch sharing one `updateDate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportBatchRequest {
    pub items: Vec<ShopUnitImport>,
    #[serde(rename = "updateDate")]
    pub update_date: DateTime<Utc>,
}
