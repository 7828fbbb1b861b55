//! Demo data provider for testing and onboarding
//!
//! Generates realistic demo data:
//! - 180 days of movements with paycheck/rent/grocery patterns
//! - a scanned receipt with line items
//! - budgets for the current month
//! - a savings goal with contributions
//! - a shopping list
//!
//! Also implements the analysis port with canned payloads so `cent scan`
//! and `cent voice` work end to end without the cloud service.

use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{
    Budget, ExtractionPayload, Movement, MovementKind, Receipt, ReceiptItem, SavingsGoal,
    ShoppingItem, ShoppingList, Source, VoicePayload,
};
use crate::ports::{DocumentAnalysisProvider, IntegrationProvider, ReceiptAnalysis, VoiceAnalysis};

// Builtin category ids from the schema seed set
const CAT_SALARY: &str = "a1000000-0000-0000-0000-000000000001";
const CAT_GROCERIES: &str = "a2000000-0000-0000-0000-000000000001";
const CAT_DINING: &str = "a2000000-0000-0000-0000-000000000002";
const CAT_TRANSPORT: &str = "a2000000-0000-0000-0000-000000000003";
const CAT_HOUSING: &str = "a2000000-0000-0000-0000-000000000004";
const CAT_UTILITIES: &str = "a2000000-0000-0000-0000-000000000005";
const CAT_ENTERTAINMENT: &str = "a2000000-0000-0000-0000-000000000007";

const DEMO_GOAL_ID: &str = "66666666-6666-6666-6666-666666666666";

fn category(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

/// Generate demo movements (180 days of realistic data)
pub fn generate_demo_movements() -> Vec<Movement> {
    let today = Utc::now().date_naive();
    let mut movements = Vec::new();

    for days_ago in 0..180 {
        let date = today - Duration::days(days_ago);
        let day_of_month = date.day();

        // Paycheck on 1st and 15th
        if day_of_month == 1 || day_of_month == 15 {
            movements.push(create_movement(
                MovementKind::Income,
                date,
                Decimal::new(212500, 2), // 2,125.00
                "Payroll direct deposit",
                category(CAT_SALARY),
            ));
        }

        // Rent on 5th
        if day_of_month == 5 {
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(115000, 2), // 1,150.00
                "Apartment rent",
                category(CAT_HOUSING),
            ));
        }

        // Utilities on 10th
        if day_of_month == 10 {
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(9500, 2), // 95.00
                "Electricity and water",
                category(CAT_UTILITIES),
            ));
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(4500, 2), // 45.00
                "Internet",
                category(CAT_UTILITIES),
            ));
        }

        // Goal contribution on 16th
        if day_of_month == 16 {
            let mut saving = create_movement(
                MovementKind::Saving,
                date,
                Decimal::new(30000, 2), // 300.00
                "Monthly goal contribution",
                None,
            );
            saving.goal_id = Uuid::parse_str(DEMO_GOAL_ID).ok();
            movements.push(saving);
        }

        // Groceries every 3 days
        if days_ago % 3 == 0 {
            let amounts = [4523i64, 3745, 5234, 4100, 2899, 6523];
            let amount = amounts[days_ago as usize % amounts.len()];
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(amount, 2),
                "Supermarket",
                category(CAT_GROCERIES),
            ));
        }

        // Dining out twice a week
        if days_ago % 3 == 1 || days_ago % 7 == 0 {
            let restaurants = [
                ("Taqueria", 1250i64),
                ("Salad bar", 1450),
                ("Steakhouse", 8500),
                ("Pho place", 2200),
                ("Burger joint", 1875),
            ];
            let (name, amount) = restaurants[days_ago as usize % restaurants.len()];
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(amount, 2),
                name,
                category(CAT_DINING),
            ));
        }

        // Gas every 7 days
        if days_ago % 7 == 0 {
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(5500, 2), // 55.00
                "Gas station",
                category(CAT_TRANSPORT),
            ));
        }

        // Subscriptions on various days
        if day_of_month == 3 {
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(1599, 2), // 15.99
                "Streaming service",
                category(CAT_ENTERTAINMENT),
            ));
        }
        if day_of_month == 7 {
            movements.push(create_movement(
                MovementKind::Expense,
                date,
                Decimal::new(1099, 2), // 10.99
                "Music subscription",
                category(CAT_ENTERTAINMENT),
            ));
        }
    }

    movements
}

fn create_movement(
    kind: MovementKind,
    date: NaiveDate,
    amount: Decimal,
    description: &str,
    category_id: Option<Uuid>,
) -> Movement {
    let mut movement = Movement::new(Uuid::new_v4(), kind, amount, date);
    movement.description = Some(description.to_string());
    movement.category_id = category_id;
    if kind == MovementKind::Expense {
        movement.source = Some(Source::Manual);
    }
    movement
}

/// Generate a demo receipt with line items, plus its expense movement
pub fn generate_demo_receipt() -> (Receipt, Movement) {
    let date = Utc::now().date_naive() - Duration::days(2);
    let mut receipt = Receipt::new(Uuid::new_v4(), Decimal::new(2374, 2), "USD", date);
    receipt.merchant = Some("Corner Market".to_string());
    receipt.items = vec![
        receipt_item(receipt.id, "Milk", 2, 150, 300),
        receipt_item(receipt.id, "Bread", 1, 225, 225),
        receipt_item(receipt.id, "Eggs", 1, 399, 399),
        receipt_item(receipt.id, "Chicken breast", 1, 850, 850),
        receipt_item(receipt.id, "Apples", 4, 150, 600),
    ];
    receipt.ensure_fingerprint();

    let mut movement = Movement::new(
        Uuid::new_v4(),
        MovementKind::Expense,
        receipt.total,
        date,
    );
    movement.description = receipt.merchant.clone();
    movement.category_id = category(CAT_GROCERIES);
    movement.source = Some(Source::Receipt);
    movement.receipt_id = Some(receipt.id);

    (receipt, movement)
}

fn receipt_item(receipt_id: Uuid, name: &str, qty: i64, unit_cents: i64, total_cents: i64) -> ReceiptItem {
    let mut item = ReceiptItem::new(receipt_id, name);
    item.quantity = Decimal::new(qty, 0);
    item.unit_price = Decimal::new(unit_cents, 2);
    item.line_total = Decimal::new(total_cents, 2);
    item
}

/// Generate demo budgets for the current month
pub fn generate_demo_budgets() -> Vec<Budget> {
    let month = Utc::now().date_naive().with_day(1).unwrap();
    [
        (CAT_GROCERIES, 60000i64), // 600.00
        (CAT_DINING, 25000),
        (CAT_TRANSPORT, 20000),
        (CAT_ENTERTAINMENT, 8000),
    ]
    .iter()
    .filter_map(|(cat, cents)| {
        let category_id = category(cat)?;
        Some(Budget::new(
            Uuid::new_v4(),
            category_id,
            month,
            Decimal::new(*cents, 2),
        ))
    })
    .collect()
}

/// Generate the demo savings goal
pub fn generate_demo_goal() -> SavingsGoal {
    let mut goal = SavingsGoal::new(
        Uuid::parse_str(DEMO_GOAL_ID).unwrap(),
        "Vacation fund",
        Decimal::new(300000, 2), // 3,000.00
    );
    goal.deadline = Some(Utc::now().date_naive() + Duration::days(240));
    goal
}

/// Generate the demo shopping list
pub fn generate_demo_shopping_list() -> ShoppingList {
    let mut list = ShoppingList::new(Uuid::new_v4(), "Weekly groceries");

    let entries: [(&str, i64, Option<i64>, bool); 5] = [
        ("Milk", 2, Some(150), true),
        ("Bread", 1, Some(225), false),
        ("Coffee beans", 1, Some(1250), false),
        ("Paper towels", 1, None, false),
        ("Bananas", 6, Some(25), true),
    ];

    for (name, qty, price_cents, checked) in entries {
        let mut item = ShoppingItem::new(list.id, name);
        item.quantity = Decimal::new(qty, 0);
        item.unit_price = price_cents.map(|c| Decimal::new(c, 2));
        item.checked = checked;
        list.items.push(item);
    }

    list
}

// =============================================================================
// DemoAnalysisProvider - implements DocumentAnalysisProvider trait
// =============================================================================

/// Demo analysis provider
///
/// Returns canned payloads so the scan and voice flows can be exercised
/// without network access. The receipt payload deliberately uses alternate
/// field names and string amounts to exercise the reconciliation path.
pub struct DemoAnalysisProvider;

impl DemoAnalysisProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoAnalysisProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAnalysisProvider for DemoAnalysisProvider {
    fn name(&self) -> &str {
        "demo"
    }

    fn can_analyze_receipts(&self) -> bool {
        true
    }

    fn can_analyze_voice(&self) -> bool {
        true
    }

    fn analyze_receipt(&self, _image_path: &Path, _settings: &JsonValue) -> Result<ReceiptAnalysis> {
        let today = Utc::now().date_naive();
        let body = serde_json::json!({
            "store": "Corner Market",
            "date": today.format("%Y-%m-%d").to_string(),
            "summary": "23.74",
            "currency": "USD",
            "lineItems": [
                {"product": "Milk", "qty": 2, "price": "1.50"},
                {"product": "Bread", "lineTotal": 2.25},
                {"product": "Eggs", "price": 3.99},
                {"product": "Chicken breast", "price": 8.50},
                {"product": "Apples", "qty": 4, "price": 1.50}
            ]
        });

        let payload = ExtractionPayload::parse(&body.to_string()).unwrap_or_default();
        Ok(ReceiptAnalysis {
            payload,
            warnings: Vec::new(),
        })
    }

    fn analyze_voice(&self, _audio_path: &Path, _settings: &JsonValue) -> Result<VoiceAnalysis> {
        let body = serde_json::json!({
            "type": "expense",
            "total": 12.50,
            "categoryName": "Dining",
            "transcript": "Lunch at the taqueria, twelve fifty"
        });

        let payload = VoicePayload::parse(&body.to_string()).unwrap_or_default();
        Ok(VoiceAnalysis {
            payload,
            warnings: Vec::new(),
        })
    }
}

impl IntegrationProvider for DemoAnalysisProvider {
    fn setup(&self, _options: &JsonValue) -> Result<JsonValue> {
        // Demo integration needs no configuration
        Ok(serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_movements_are_valid() {
        for movement in generate_demo_movements() {
            assert!(movement.validate().is_ok(), "{:?}", movement);
        }
    }

    #[test]
    fn test_demo_receipt_total_matches_items() {
        let (receipt, movement) = generate_demo_receipt();
        let item_sum: Decimal = receipt.items.iter().map(|i| i.line_total).sum();
        assert_eq!(receipt.total, item_sum);
        assert_eq!(movement.amount, receipt.total);
        assert!(receipt.fingerprint.is_some());
    }

    #[test]
    fn test_demo_receipt_payload_reconciles() {
        let provider = DemoAnalysisProvider::new();
        let analysis = provider
            .analyze_receipt(Path::new("unused.jpg"), &serde_json::json!({}))
            .unwrap();

        let resolved = analysis.payload.resolve_total();
        assert_eq!(resolved.amount, Decimal::new(2374, 2));

        let items = analysis.payload.reconcile_items();
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_demo_voice_payload_is_expense() {
        let provider = DemoAnalysisProvider::new();
        let analysis = provider
            .analyze_voice(Path::new("unused.m4a"), &serde_json::json!({}))
            .unwrap();
        assert_eq!(analysis.payload.resolve_kind(), MovementKind::Expense);
        assert_eq!(analysis.payload.amount, Some(Decimal::new(1250, 2)));
    }
}
