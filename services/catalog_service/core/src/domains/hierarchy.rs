//! Closure-table representation of the ancestor/descendant relation.

use uuid::Uuid;

/// One row of the closure table: `ancestor` is a category that transitively
/// (or directly) contains `descendant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HierarchyEdge {
    pub ancestor_id: Uuid,
    pub descendant_id: Uuid,
}

impl HierarchyEdge {
    pub fn new(ancestor_id: Uuid, descendant_id: Uuid) -> Self {
        Self { ancestor_id, descendant_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_stores_both_ends() {
        let a = Uuid::now_v7();
        let d = Uuid::now_v7();
        let edge = HierarchyEdge::new(a, d);
        assert_eq!(edge.ancestor_id, a);
        assert_eq!(edge.descendant_id, d);
    }
}
