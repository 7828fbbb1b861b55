//! Shopping service - lists, items, and the purchase flow

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::{
    Movement, MovementKind, Receipt, ReceiptItem, ShoppingItem, ShoppingList, Source,
};

/// Shopping service
pub struct ShoppingService {
    repository: Arc<DuckDbRepository>,
    default_currency: String,
}

impl ShoppingService {
    pub fn new(repository: Arc<DuckDbRepository>, default_currency: String) -> Self {
        Self {
            repository,
            default_currency,
        }
    }

    /// Create a new shopping list
    pub fn create_list(&self, name: &str) -> Result<ShoppingList> {
        if self.repository.get_shopping_list_by_name(name)?.is_some() {
            anyhow::bail!("List already exists: {}", name);
        }

        let list = ShoppingList::new(Uuid::new_v4(), name.trim());
        list.validate()
            .map_err(|e| anyhow::anyhow!("Invalid list: {}", e))?;
        self.repository.insert_shopping_list(&list)?;
        Ok(list)
    }

    /// All lists with item counts and estimated totals
    pub fn list_summaries(&self) -> Result<Vec<ListSummary>> {
        let lists = self.repository.get_shopping_lists()?;
        Ok(lists
            .iter()
            .map(|list| ListSummary {
                id: list.id.to_string(),
                name: list.name.clone(),
                item_count: list.items.len(),
                checked_count: list.items.iter().filter(|i| i.checked).count(),
                estimated_total: list.estimated_total(),
            })
            .collect())
    }

    /// One list with its items, referenced by name
    pub fn get_list(&self, name: &str) -> Result<ShoppingList> {
        self.resolve_list(name)
    }

    /// Add an item to a list
    pub fn add_item(
        &self,
        list_name: &str,
        item_name: &str,
        quantity: Decimal,
        unit_price: Option<Decimal>,
    ) -> Result<ShoppingItem> {
        if item_name.trim().is_empty() {
            anyhow::bail!("Item name cannot be empty");
        }
        if quantity <= Decimal::ZERO {
            anyhow::bail!("Quantity must be positive");
        }

        let list = self.resolve_list(list_name)?;

        let mut item = ShoppingItem::new(list.id, item_name.trim());
        item.quantity = quantity;
        item.unit_price = unit_price;
        self.repository.upsert_shopping_item(&item)?;
        Ok(item)
    }

    /// Toggle an item's checked flag, referenced by name within the list
    pub fn set_checked(&self, list_name: &str, item_name: &str, checked: bool) -> Result<()> {
        let list = self.resolve_list(list_name)?;
        let item = Self::find_item(&list, item_name)?;
        self.repository
            .set_shopping_item_checked(&item.id.to_string(), checked)?;
        Ok(())
    }

    /// Remove a single item from a list
    pub fn remove_item(&self, list_name: &str, item_name: &str) -> Result<()> {
        let list = self.resolve_list(list_name)?;
        let item = Self::find_item(&list, item_name)?;
        self.repository.delete_shopping_item(&item.id.to_string())?;
        Ok(())
    }

    /// Delete a whole list with its items
    pub fn remove_list(&self, list_name: &str) -> Result<()> {
        let list = self.resolve_list(list_name)?;
        self.repository.delete_shopping_list(&list.id.to_string())?;
        Ok(())
    }

    /// Convert a finished shopping trip into ledger entries
    ///
    /// The list's checked, priced items become a receipt plus one expense
    /// movement for the receipt total. Completed items are removed from the
    /// list; unchecked items stay for the next trip.
    pub fn complete(&self, list_name: &str) -> Result<CompletedTrip> {
        let list = self.resolve_list(list_name)?;

        let purchased: Vec<&ShoppingItem> = list
            .items
            .iter()
            .filter(|i| i.checked && i.unit_price.is_some())
            .collect();

        if purchased.is_empty() {
            anyhow::bail!(
                "No checked items with a price on '{}'. Check off what you bought first.",
                list.name
            );
        }

        let skipped_unpriced = list
            .items
            .iter()
            .filter(|i| i.checked && i.unit_price.is_none())
            .count();

        let total: Decimal = purchased
            .iter()
            .filter_map(|i| i.unit_price.map(|p| p * i.quantity))
            .sum();

        let today = Utc::now().date_naive();
        let mut receipt = Receipt::new(Uuid::new_v4(), total, self.default_currency.clone(), today);
        receipt.merchant = Some(list.name.clone());
        receipt.items = purchased
            .iter()
            .map(|i| {
                let unit_price = i.unit_price.unwrap_or(Decimal::ZERO);
                let mut item = ReceiptItem::new(receipt.id, i.name.clone());
                item.quantity = i.quantity;
                item.unit_price = unit_price;
                item.line_total = unit_price * i.quantity;
                item
            })
            .collect();
        receipt.ensure_fingerprint();

        let mut movement = Movement::new(Uuid::new_v4(), MovementKind::Expense, total, today);
        movement.currency = self.default_currency.clone();
        movement.description = Some(format!("Shopping: {}", list.name));
        movement.source = Some(Source::Receipt);
        movement.receipt_id = Some(receipt.id);

        self.repository.insert_receipt(&receipt)?;
        self.repository.upsert_movement(&movement)?;
        for item in &purchased {
            self.repository.delete_shopping_item(&item.id.to_string())?;
        }

        Ok(CompletedTrip {
            list: list.name.clone(),
            receipt_id: receipt.id.to_string(),
            movement_id: movement.id.to_string(),
            total,
            currency: movement.currency.clone(),
            items_purchased: purchased.len(),
            items_skipped_unpriced: skipped_unpriced,
        })
    }

    fn resolve_list(&self, name: &str) -> Result<ShoppingList> {
        self.repository
            .get_shopping_list_by_name(name)?
            .ok_or_else(|| anyhow::anyhow!("List not found: {}", name))
    }

    fn find_item<'a>(list: &'a ShoppingList, item_name: &str) -> Result<&'a ShoppingItem> {
        let needle = item_name.trim().to_lowercase();
        list.items
            .iter()
            .find(|i| i.name.to_lowercase() == needle)
            .ok_or_else(|| {
                anyhow::anyhow!("Item not found on '{}': {}", list.name, item_name)
            })
    }
}

/// Summary row for `cent shopping lists`
#[derive(Debug, Clone, Serialize)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
    pub checked_count: usize,
    pub estimated_total: Decimal,
}

/// Result of completing a shopping trip
#[derive(Debug, Clone, Serialize)]
pub struct CompletedTrip {
    pub list: String,
    pub receipt_id: String,
    pub movement_id: String,
    pub total: Decimal,
    pub currency: String,
    pub items_purchased: usize,
    /// Checked items without a price are left on the list
    pub items_skipped_unpriced: usize,
}
