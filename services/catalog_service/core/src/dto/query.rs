//! Query-string parameters for the read endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `?dateStart=&dateEnd=` on `GET /node/{id}/statistic`.
///
/// Both bounds are optional; a present `dateStart` must be strictly
/// less than a present `dateEnd`, enforced by the reader.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatisticQuery {
    #[serde(rename = "dateStart")]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(rename = "dateEnd")]
    pub date_end: Option<DateTime<Utc>>,
}

/// `?date=` on `GET /sales`, required.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesQuery {
    pub date: DateTime<Utc>,
}
