//! `GET /nodes/{id}` response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::{UnitKind, UnitNode};

/// A unit with its subtree, as returned by the `node(id)` reader.
///
/// `children` is a list (possibly empty) for categories and absent
/// (`null`) for offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopUnit {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ShopUnit>>,
}

impl From<UnitNode> for ShopUnit {
    fn from(node: UnitNode) -> Self {
        ShopUnit {
            id: node.unit.id,
            name: node.unit.name,
            date: node.unit.last_update,
            parent_id: node.unit.parent_id,
            kind: node.unit.kind,
            price: node.unit.price,
            children: node
                .children
                .map(|cs| cs.into_iter().map(ShopUnit::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::Unit;

    fn offer() -> Unit {
        Unit {
            id: Uuid::now_v7(),
            name: "offer".to_string(),
            parent_id: None,
            kind: UnitKind::Offer,
            price: Some(100),
            last_update: Utc::now(),
        }
    }

    #[test]
    fn offer_node_serializes_without_children_field() {
        let shop_unit = ShopUnit::from(UnitNode::leaf(offer()));
        let json = serde_json::to_value(&shop_unit).unwrap();
        assert!(!json.as_object().unwrap().contains_key("children"));
    }

    #[test]
    fn category_node_keeps_empty_children_array() {
        let mut category = offer();
        category.kind = UnitKind::Category;
        category.price = None;
        let shop_unit = ShopUnit::from(UnitNode::leaf(category));
        let json = serde_json::to_value(&shop_unit).unwrap();
        assert_eq!(json["children"], serde_json::json!([]));
    }
}
