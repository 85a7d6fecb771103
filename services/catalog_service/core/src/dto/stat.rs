//! `GET /node/{id}/statistic` and `GET /sales` response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::{PriceHistoryEvent, Unit, UnitKind};

/// One history/sales entry: the current unit attributes plus one
/// recorded `(price, date)` pair.
///
/// Per the frozen open question in spec §9, `name`/`parentId`/`type`
/// reflect the unit's *current* values, not a snapshot taken at event
/// time; only `price` and `date` come from the event itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatUnit {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    pub price: Option<i64>,
    pub date: DateTime<Utc>,
}

impl StatUnit {
    pub fn from_event(unit: &Unit, event: &PriceHistoryEvent) -> Self {
        StatUnit {
            id: unit.id,
            name: unit.name.clone(),
            parent_id: unit.parent_id,
            kind: unit.kind,
            price: event.price,
            date: event.date,
        }
    }
}

/// Envelope shared by `/node/{id}/statistic` and `/sales`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatUnitList {
    pub items: Vec<StatUnit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_event_carries_current_unit_fields_and_event_price() {
        let unit = Unit {
            id: Uuid::now_v7(),
            name: "offer".to_string(),
            parent_id: Some(Uuid::now_v7()),
            kind: UnitKind::Offer,
            price: Some(999),
            last_update: Utc::now(),
        };
        let event = PriceHistoryEvent {
            seq: 1,
            unit_id: unit.id,
            price: Some(500),
            date: Utc::now() - chrono::Duration::hours(1),
        };
        let stat = StatUnit::from_event(&unit, &event);
        assert_eq!(stat.price, Some(500));
        assert_eq!(stat.name, unit.name);
        assert_eq!(stat.date, event.date);
    }
}
