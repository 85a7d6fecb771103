//! Per-category `(sum, count)` aggregate backing the derived floored mean.

use uuid::Uuid;

/// `(sum, count)` for a category, plus the additive delta used while planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryAggregate {
    pub category_id: Uuid,
    pub sum: i64,
    pub count: i64,
}

impl CategoryAggregate {
    pub fn empty(category_id: Uuid) -> Self {
        Self { category_id, sum: 0, count: 0 }
    }

    /// `floor(sum/count)`, absent when `count == 0`.
    pub fn mean(&self) -> Option<i64> {
        if self.count > 0 {
            Some(self.sum.div_euclid(self.count))
        } else {
            None
        }
    }

    pub fn apply_delta(&mut self, delta: AggregateDelta) {
        self.sum += delta.delta_sum;
        self.count += delta.delta_count;
    }
}

/// An additive `(Δsum, Δcount)` contribution to one category's aggregate.
///
/// Deltas from multiple units in the same batch sum before being applied;
/// order of summation does not affect the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateDelta {
    pub delta_sum: i64,
    pub delta_count: i64,
}

impl AggregateDelta {
    pub fn new(delta_sum: i64, delta_count: i64) -> Self {
        Self { delta_sum, delta_count }
    }

    pub fn combine(self, other: AggregateDelta) -> AggregateDelta {
        AggregateDelta {
            delta_sum: self.delta_sum + other.delta_sum,
            delta_count: self.delta_count + other.delta_count,
        }
    }
}

impl std::ops::AddAssign for AggregateDelta {
    fn add_assign(&mut self, rhs: AggregateDelta) {
        self.delta_sum += rhs.delta_sum;
        self.delta_count += rhs.delta_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_is_floored() {
        let agg = CategoryAggregate { category_id: Uuid::now_v7(), sum: 139998, count: 2 };
        assert_eq!(agg.mean(), Some(69999));
    }

    #[test]
    fn mean_is_absent_when_count_zero() {
        let agg = CategoryAggregate::empty(Uuid::now_v7());
        assert_eq!(agg.mean(), None);
    }

    #[test]
    fn delta_combine_sums_components() {
        let a = AggregateDelta::new(100, 1);
        let b = AggregateDelta::new(-40, 0);
        assert_eq!(a.combine(b), AggregateDelta::new(60, 1));
    }

    #[test]
    fn apply_delta_can_zero_out_count() {
        let mut agg = CategoryAggregate { category_id: Uuid::now_v7(), sum: 79999, count: 1 };
        agg.apply_delta(AggregateDelta::new(-79999, -1));
        assert_eq!(agg.sum, 0);
        assert_eq!(agg.count, 0);
        assert_eq!(agg.mean(), None);
    }
}
