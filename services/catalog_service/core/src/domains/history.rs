//! Append-only price history, one event per affected unit per mutation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single recorded price at a point in time for one unit.
///
/// `price` is absent for a category that dropped to zero offer-descendants.
/// `seq` orders events for deterministic "most recent" queries when two
/// events share a `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistoryEvent {
    pub seq: i64,
    pub unit_id: Uuid,
    pub price: Option<i64>,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_can_carry_absent_price() {
        let event = PriceHistoryEvent {
            seq: 1,
            unit_id: Uuid::now_v7(),
            price: None,
            date: Utc::now(),
        };
        assert!(event.price.is_none());
    }
}
