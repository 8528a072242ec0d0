use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stocked product, keyed by SKU.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct InventoryItem {
    pub id: i64,
    pub sku: String,
    pub product_name: String,
    pub category: Option<String>,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub unit_cost: f64,
    pub unit_price: f64,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
}

impl InventoryItem {
    /// Stock at or below the reorder threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.current_stock <= self.reorder_point
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewInventoryItem {
    pub sku: String,
    pub product_name: String,
    pub category: Option<String>,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub unit_cost: f64,
    pub unit_price: f64,
    pub supplier: Option<String>,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, current_stock: i64, reorder_point: i64) -> InventoryItem {
        InventoryItem {
            id: 1,
            sku: sku.to_string(),
            product_name: "Test".to_string(),
            category: None,
            current_stock,
            reorder_point,
            unit_cost: 0.0,
            unit_price: 0.0,
            supplier: None,
            location: None,
            is_active: true,
        }
    }

    #[test]
    fn below_reorder_point_is_low() {
        assert!(item("CHR-002", 8, 15).is_low_stock());
    }

    #[test]
    fn equal_to_reorder_point_is_low() {
        assert!(item("EQ-001", 10, 10).is_low_stock());
    }

    #[test]
    fn above_reorder_point_is_not_low() {
        assert!(!item("LAP-001", 25, 10).is_low_stock());
    }
}
