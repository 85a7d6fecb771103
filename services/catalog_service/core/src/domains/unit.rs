//! The `Unit` entity: the single table backing both offers and categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates an offer (priced leaf) from a category (inner node).
///
/// Never changes for a unit once created (invariant 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitKind {
    Offer,
    Category,
}

impl UnitKind {
    pub fn is_category(self) -> bool {
        matches!(self, UnitKind::Category)
    }

    pub fn from_is_category(is_category: bool) -> Self {
        if is_category {
            UnitKind::Category
        } else {
            UnitKind::Offer
        }
    }
}

/// A unit row as stored: either an offer or a category.
///
/// `price` is always present for an offer and is the derived floored mean
/// for a category, absent when the category has zero offer-descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub kind: UnitKind,
    pub price: Option<i64>,
    pub last_update: DateTime<Utc>,
}

impl Unit {
    pub fn is_category(&self) -> bool {
        self.kind.is_category()
    }

    pub fn is_offer(&self) -> bool {
        !self.kind.is_category()
    }
}

/// A unit with its subtree materialized, used by the `node(id)` reader.
///
/// `children` is `None` for offers and `Some` (possibly empty) for
/// categories, matching the external `ShopUnit` contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNode {
    pub unit: Unit,
    pub children: Option<Vec<UnitNode>>,
}

impl UnitNode {
    pub fn leaf(unit: Unit) -> Self {
        let children = if unit.is_category() { Some(Vec::new()) } else { None };
        Self { unit, children }
    }

    /// Total node count of this snapshot, including `self`.
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map(|cs| cs.iter().map(UnitNode::count_nodes).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_unit(kind: UnitKind, price: Option<i64>) -> Unit {
        Unit {
            id: Uuid::now_v7(),
            name: "widget".to_string(),
            parent_id: None,
            kind,
            price,
            last_update: Utc::now(),
        }
    }

    #[test]
    fn offer_is_not_category() {
        let u = make_unit(UnitKind::Offer, Some(100));
        assert!(u.is_offer());
        assert!(!u.is_category());
    }

    #[test]
    fn category_leaf_gets_empty_children() {
        let u = make_unit(UnitKind::Category, None);
        let node = UnitNode::leaf(u);
        assert_eq!(node.children, Some(Vec::new()));
    }

    #[test]
    fn offer_leaf_has_no_children() {
        let u = make_unit(UnitKind::Offer, Some(100));
        let node = UnitNode::leaf(u);
        assert!(node.children.is_none());
    }

    #[test]
    fn count_nodes_includes_nested_children() {
        let root = make_unit(UnitKind::Category, Some(50));
        let child = make_unit(UnitKind::Offer, Some(50));
        let node = UnitNode {
            unit: root,
            children: Some(vec![UnitNode::leaf(child)]),
        };
        assert_eq!(node.count_nodes(), 2);
    }
}
