//! Shopping list domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shopping list with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<ShoppingItem>,
}

/// A single item on a shopping list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    /// Optional price estimate per unit
    pub unit_price: Option<Decimal>,
    pub checked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingList {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("list name cannot be empty");
        }
        Ok(())
    }

    /// Estimated total over items with a price: quantity * unit price
    pub fn estimated_total(&self) -> Decimal {
        self.items
            .iter()
            .filter_map(|i| i.unit_price.map(|p| p * i.quantity))
            .sum()
    }

    /// Estimated total over checked items with a price
    pub fn checked_total(&self) -> Decimal {
        self.items
            .iter()
            .filter(|i| i.checked)
            .filter_map(|i| i.unit_price.map(|p| p * i.quantity))
            .sum()
    }
}

impl ShoppingItem {
    pub fn new(list_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            list_id,
            name: name.into(),
            quantity: Decimal::ONE,
            unit_price: None,
            checked: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_items() -> ShoppingList {
        let mut list = ShoppingList::new(Uuid::new_v4(), "Weekly groceries");
        let mut milk = ShoppingItem::new(list.id, "Milk");
        milk.quantity = Decimal::new(2, 0);
        milk.unit_price = Some(Decimal::new(150, 2));
        milk.checked = true;

        let mut bread = ShoppingItem::new(list.id, "Bread");
        bread.unit_price = Some(Decimal::new(225, 2));

        let soap = ShoppingItem::new(list.id, "Soap"); // no price estimate

        list.items = vec![milk, bread, soap];
        list
    }

    #[test]
    fn test_estimated_total_skips_unpriced_items() {
        let list = list_with_items();
        // 2 * 1.50 + 2.25
        assert_eq!(list.estimated_total(), Decimal::new(525, 2));
    }

    #[test]
    fn test_checked_total() {
        let list = list_with_items();
        assert_eq!(list.checked_total(), Decimal::new(300, 2));
    }

    #[test]
    fn test_list_validation() {
        let mut list = ShoppingList::new(Uuid::new_v4(), "Groceries");
        assert!(list.validate().is_ok());
        list.name = " ".to_string();
        assert!(list.validate().is_err());
    }
}
