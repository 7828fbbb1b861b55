//! Integration tests for centavo-core services
//!
//! These tests verify critical data integrity scenarios using real DuckDB.
//! Network IO is covered by the demo analysis provider; all database
//! operations are real.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

use centavo_core::adapters::duckdb::{DuckDbRepository, MovementFilter};
use centavo_core::domain::{Budget, BudgetStatus, Movement, MovementKind, Source, User};
use centavo_core::services::{
    AnalysisService, Bucket, BudgetService, ExportService, MovementService, NewMovement,
    SavingsService, ShoppingService, StatsService, StatusService,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

fn movement_service(repo: &Arc<DuckDbRepository>) -> MovementService {
    MovementService::new(Arc::clone(repo), "USD".to_string())
}

/// Create a test movement
fn create_test_movement(kind: MovementKind, cents: i64, date: NaiveDate) -> Movement {
    Movement::new(Uuid::new_v4(), kind, Decimal::new(cents, 2), date)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Movement CRUD
// ============================================================================

#[test]
fn test_movement_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let mut movement = create_test_movement(MovementKind::Expense, 4250, date(2025, 3, 14));
    movement.description = Some("Corner Market".to_string());
    movement.source = Some(Source::Manual);
    movement.currency = "EUR".to_string();
    repo.upsert_movement(&movement).unwrap();

    let loaded = repo
        .get_movement_by_id(&movement.id.to_string())
        .unwrap()
        .expect("movement should exist");

    assert_eq!(loaded.id, movement.id);
    assert_eq!(loaded.kind, MovementKind::Expense);
    assert_eq!(loaded.amount, Decimal::new(4250, 2));
    assert_eq!(loaded.currency, "EUR");
    assert_eq!(loaded.description, Some("Corner Market".to_string()));
    assert_eq!(loaded.movement_date, date(2025, 3, 14));
    assert_eq!(loaded.source, Some(Source::Manual));
}

#[test]
fn test_soft_deleted_movements_are_excluded() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let keep = create_test_movement(MovementKind::Expense, 1000, date(2025, 3, 1));
    let remove = create_test_movement(MovementKind::Expense, 2000, date(2025, 3, 2));
    repo.upsert_movement(&keep).unwrap();
    repo.upsert_movement(&remove).unwrap();

    assert!(repo.soft_delete_movement(&remove.id.to_string()).unwrap());

    // Excluded from listings
    let all = repo.get_movements(&MovementFilter::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, keep.id);

    // Excluded from point lookups and counts
    assert!(repo
        .get_movement_by_id(&remove.id.to_string())
        .unwrap()
        .is_none());
    assert_eq!(repo.get_movement_count().unwrap(), 1);

    // Deleting again reports not found
    assert!(!repo.soft_delete_movement(&remove.id.to_string()).unwrap());
}

#[test]
fn test_movement_filters() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let groceries = repo.get_category_by_name("groceries").unwrap().unwrap();

    let mut in_range = create_test_movement(MovementKind::Expense, 1000, date(2025, 3, 10));
    in_range.category_id = Some(groceries.id);
    let before = create_test_movement(MovementKind::Expense, 2000, date(2025, 2, 28));
    let after = create_test_movement(MovementKind::Expense, 3000, date(2025, 4, 1));
    let income = create_test_movement(MovementKind::Income, 9000, date(2025, 3, 15));

    for m in [&in_range, &before, &after, &income] {
        repo.upsert_movement(m).unwrap();
    }

    // Date range is inclusive on both ends
    let filter = MovementFilter {
        from: Some(date(2025, 3, 1)),
        to: Some(date(2025, 3, 31)),
        ..Default::default()
    };
    let march = repo.get_movements(&filter).unwrap();
    assert_eq!(march.len(), 2);

    let filter = MovementFilter {
        kind: Some(MovementKind::Income),
        ..Default::default()
    };
    assert_eq!(repo.get_movements(&filter).unwrap().len(), 1);

    let filter = MovementFilter {
        category_id: Some(groceries.id),
        ..Default::default()
    };
    let by_category = repo.get_movements(&filter).unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].id, in_range.id);
}

#[test]
fn test_movement_service_applies_default_currency() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = MovementService::new(Arc::clone(&repo), "MXN".to_string());

    let record = service
        .add(NewMovement::new(
            MovementKind::Expense,
            Decimal::new(500, 2),
        ))
        .unwrap();
    assert_eq!(record.currency, "MXN");

    let mut input = NewMovement::new(MovementKind::Expense, Decimal::new(500, 2));
    input.currency = Some("usd".to_string());
    let record = service.add(input).unwrap();
    assert_eq!(record.currency, "USD");
}

#[test]
fn test_movement_service_rejects_unknown_category() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = movement_service(&repo);

    let mut input = NewMovement::new(MovementKind::Expense, Decimal::new(500, 2));
    input.category = Some("Not A Category".to_string());
    let result = service.add(input);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Category not found"));
}

// ============================================================================
// Receipts
// ============================================================================

#[test]
fn test_receipt_insert_with_items() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let mut receipt = centavo_core::Receipt::new(
        Uuid::new_v4(),
        Decimal::new(525, 2),
        "USD",
        date(2025, 3, 14),
    );
    receipt.merchant = Some("Corner Market".to_string());
    let mut item = centavo_core::ReceiptItem::new(receipt.id, "Milk");
    item.quantity = Decimal::new(2, 0);
    item.unit_price = Decimal::new(150, 2);
    item.line_total = Decimal::new(300, 2);
    receipt.items.push(item);
    receipt.ensure_fingerprint();

    repo.insert_receipt(&receipt).unwrap();

    let loaded = repo
        .get_receipt_by_id(&receipt.id.to_string())
        .unwrap()
        .expect("receipt should exist");
    assert_eq!(loaded.merchant, Some("Corner Market".to_string()));
    assert_eq!(loaded.total, Decimal::new(525, 2));
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items[0].name, "Milk");
    assert_eq!(loaded.items[0].line_total, Decimal::new(300, 2));

    let fingerprint = receipt.fingerprint.as_deref().unwrap();
    assert!(repo.receipt_exists_by_fingerprint(fingerprint).unwrap());
    assert!(!repo.receipt_exists_by_fingerprint("0000000000000000").unwrap());

    // Listings come back newest purchase first
    let mut older = centavo_core::Receipt::new(
        Uuid::new_v4(),
        Decimal::new(999, 2),
        "USD",
        date(2025, 2, 1),
    );
    older.ensure_fingerprint();
    repo.insert_receipt(&older).unwrap();

    let receipts = repo.get_receipts(10).unwrap();
    assert_eq!(receipts.len(), 2);
    assert_eq!(receipts[0].id, receipt.id);
}

#[test]
fn test_scan_twice_is_duplicate() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    repo.upsert_integration("demo", &serde_json::json!({})).unwrap();

    let service = AnalysisService::new(
        Arc::clone(&repo),
        "USD".to_string(),
        centavo_core::config::AnalysisSettings::default(),
    );

    let first = service.scan_receipt(std::path::Path::new("receipt.jpg")).unwrap();
    assert!(!first.duplicate);
    assert!(first.receipt_id.is_some());
    assert_eq!(first.item_count, 5);
    assert_eq!(first.total, Decimal::new(2374, 2));

    // The demo provider returns the same receipt every time; the second
    // scan must be caught by the fingerprint check
    let second = service.scan_receipt(std::path::Path::new("receipt.jpg")).unwrap();
    assert!(second.duplicate);
    assert!(second.receipt_id.is_none());

    assert_eq!(repo.get_receipt_count().unwrap(), 1);
    assert_eq!(repo.get_movement_count().unwrap(), 1);
}

#[test]
fn test_scan_creates_receipt_backed_expense() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    repo.upsert_integration("demo", &serde_json::json!({})).unwrap();

    let service = AnalysisService::new(
        Arc::clone(&repo),
        "USD".to_string(),
        centavo_core::config::AnalysisSettings::default(),
    );
    let scan = service.scan_receipt(std::path::Path::new("receipt.jpg")).unwrap();

    let movement = repo
        .get_movement_by_id(scan.movement_id.as_deref().unwrap())
        .unwrap()
        .expect("movement should exist");
    assert_eq!(movement.kind, MovementKind::Expense);
    assert_eq!(movement.source, Some(Source::Receipt));
    assert_eq!(
        movement.receipt_id.map(|id| id.to_string()),
        scan.receipt_id
    );
    assert_eq!(movement.amount, scan.total);
}

#[test]
fn test_voice_note_creates_movement() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    repo.upsert_integration("demo", &serde_json::json!({})).unwrap();

    let service = AnalysisService::new(
        Arc::clone(&repo),
        "USD".to_string(),
        centavo_core::config::AnalysisSettings::default(),
    );
    let voice = service.record_voice(std::path::Path::new("note.m4a")).unwrap();

    assert_eq!(voice.kind, MovementKind::Expense);
    assert_eq!(voice.amount, Decimal::new(1250, 2));
    // Demo payload names the builtin Dining category
    assert_eq!(voice.category, Some("Dining".to_string()));

    let movement = repo
        .get_movement_by_id(&voice.movement_id)
        .unwrap()
        .expect("movement should exist");
    assert_eq!(movement.source, Some(Source::Voice));
    assert!(movement.category_id.is_some());
    assert!(movement.receipt_id.is_none());
}

#[test]
fn test_analysis_requires_integration() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let service = AnalysisService::new(
        Arc::clone(&repo),
        "USD".to_string(),
        centavo_core::config::AnalysisSettings::default(),
    );
    let result = service.scan_receipt(std::path::Path::new("receipt.jpg"));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("No analysis integration configured"));
}

// ============================================================================
// Budgets
// ============================================================================

#[test]
fn test_budget_unique_per_category_and_month() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    let groceries = repo.get_category_by_name("Groceries").unwrap().unwrap();
    let month = date(2025, 3, 1);

    let first = Budget::new(Uuid::new_v4(), groceries.id, month, Decimal::new(50000, 2));
    let second = Budget::new(Uuid::new_v4(), groceries.id, month, Decimal::new(60000, 2));
    repo.upsert_budget(&first).unwrap();
    repo.upsert_budget(&second).unwrap();

    // The second upsert updated the first row instead of adding one
    let budgets = repo.get_budgets_for_month(month).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, Decimal::new(60000, 2));
    assert_eq!(budgets[0].id, first.id);
}

#[test]
fn test_budget_progress_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = BudgetService::new(Arc::clone(&repo));

    let groceries = repo.get_category_by_name("Groceries").unwrap().unwrap();
    let month = date(2025, 3, 1);

    // Budget 500.00, spent 350.00 -> on track (70%)
    let mut spend = create_test_movement(MovementKind::Expense, 35000, date(2025, 3, 10));
    spend.category_id = Some(groceries.id);
    repo.upsert_movement(&spend).unwrap();

    let progress = service
        .set_budget("Groceries", month, Decimal::new(50000, 2))
        .unwrap();
    assert_eq!(progress.status, BudgetStatus::OnTrack);
    assert_eq!(progress.spent, Decimal::new(35000, 2));
    assert_eq!(progress.remaining, Decimal::new(15000, 2));

    // Another 50.00 -> exactly 80% -> warning
    let mut spend = create_test_movement(MovementKind::Expense, 5000, date(2025, 3, 12));
    spend.category_id = Some(groceries.id);
    repo.upsert_movement(&spend).unwrap();

    let report = service.month_status(month).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].status, BudgetStatus::Warning);

    // Blow past the budget -> exceeded
    let mut spend = create_test_movement(MovementKind::Expense, 20000, date(2025, 3, 20));
    spend.category_id = Some(groceries.id);
    repo.upsert_movement(&spend).unwrap();

    let report = service.month_status(month).unwrap();
    assert_eq!(report[0].status, BudgetStatus::Exceeded);
    assert_eq!(report[0].remaining, Decimal::ZERO);
}

#[test]
fn test_budget_ignores_other_months_and_kinds() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = BudgetService::new(Arc::clone(&repo));

    let groceries = repo.get_category_by_name("Groceries").unwrap().unwrap();

    // Expense in another month, income in the budget month
    let mut other_month = create_test_movement(MovementKind::Expense, 40000, date(2025, 2, 10));
    other_month.category_id = Some(groceries.id);
    repo.upsert_movement(&other_month).unwrap();

    let mut income = create_test_movement(MovementKind::Income, 40000, date(2025, 3, 10));
    income.category_id = Some(groceries.id);
    repo.upsert_movement(&income).unwrap();

    let progress = service
        .set_budget("Groceries", date(2025, 3, 1), Decimal::new(50000, 2))
        .unwrap();
    assert_eq!(progress.spent, Decimal::ZERO);
    assert_eq!(progress.status, BudgetStatus::OnTrack);
}

// ============================================================================
// Savings goals
// ============================================================================

#[test]
fn test_goal_contribute_and_progress() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = SavingsService::new(Arc::clone(&repo), movement_service(&repo));

    service
        .create_goal("Vacation", Decimal::new(100000, 2), None)
        .unwrap();

    let summary = service
        .contribute("Vacation", Decimal::new(25000, 2), Some(date(2025, 3, 1)))
        .unwrap();
    assert_eq!(summary.progress.saved, Decimal::new(25000, 2));
    assert!(!summary.progress.reached);

    let summary = service
        .contribute("vacation", Decimal::new(80000, 2), None)
        .unwrap();
    assert!(summary.progress.reached);
    assert_eq!(summary.progress.remaining, Decimal::ZERO);

    // Contributions are saving movements linked to the goal
    let filter = MovementFilter {
        kind: Some(MovementKind::Saving),
        ..Default::default()
    };
    let savings = repo.get_movements(&filter).unwrap();
    assert_eq!(savings.len(), 2);
    assert!(savings.iter().all(|m| m.goal_id.is_some()));
}

#[test]
fn test_goal_removal_keeps_movements() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = SavingsService::new(Arc::clone(&repo), movement_service(&repo));

    service
        .create_goal("Vacation", Decimal::new(100000, 2), None)
        .unwrap();
    service
        .contribute("Vacation", Decimal::new(25000, 2), None)
        .unwrap();

    service.remove_goal("Vacation").unwrap();

    assert!(service.goal_progress("Vacation").is_err());

    // The saving movement survives, detached from the goal
    let filter = MovementFilter {
        kind: Some(MovementKind::Saving),
        ..Default::default()
    };
    let savings = repo.get_movements(&filter).unwrap();
    assert_eq!(savings.len(), 1);
    assert!(savings[0].goal_id.is_none());
}

// ============================================================================
// Shopping lists
// ============================================================================

#[test]
fn test_shopping_complete_creates_receipt_and_expense() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = ShoppingService::new(Arc::clone(&repo), "USD".to_string());

    service.create_list("Weekly").unwrap();
    service
        .add_item("Weekly", "Milk", Decimal::new(2, 0), Some(Decimal::new(150, 2)))
        .unwrap();
    service
        .add_item("Weekly", "Bread", Decimal::ONE, Some(Decimal::new(225, 2)))
        .unwrap();
    service
        .add_item("Weekly", "Soap", Decimal::ONE, None)
        .unwrap();

    service.set_checked("Weekly", "Milk", true).unwrap();
    service.set_checked("Weekly", "Soap", true).unwrap();

    let trip = service.complete("Weekly").unwrap();
    // Milk only: 2 x 1.50; Soap is checked but unpriced, Bread unchecked
    assert_eq!(trip.total, Decimal::new(300, 2));
    assert_eq!(trip.items_purchased, 1);
    assert_eq!(trip.items_skipped_unpriced, 1);

    let receipt = repo
        .get_receipt_by_id(&trip.receipt_id)
        .unwrap()
        .expect("receipt should exist");
    assert_eq!(receipt.items.len(), 1);
    assert_eq!(receipt.merchant, Some("Weekly".to_string()));

    let movement = repo
        .get_movement_by_id(&trip.movement_id)
        .unwrap()
        .expect("movement should exist");
    assert_eq!(movement.source, Some(Source::Receipt));
    assert_eq!(movement.amount, Decimal::new(300, 2));

    // Purchased items leave the list; the rest stay
    let list = service.get_list("Weekly").unwrap();
    let names: Vec<&str> = list.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Bread"));
    assert!(names.contains(&"Soap"));
}

#[test]
fn test_shopping_complete_requires_checked_priced_items() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = ShoppingService::new(Arc::clone(&repo), "USD".to_string());

    service.create_list("Weekly").unwrap();
    service
        .add_item("Weekly", "Milk", Decimal::ONE, Some(Decimal::new(150, 2)))
        .unwrap();

    // Nothing checked yet
    assert!(service.complete("Weekly").is_err());
}

#[test]
fn test_shopping_list_cascade_delete() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = ShoppingService::new(Arc::clone(&repo), "USD".to_string());

    service.create_list("Weekly").unwrap();
    service
        .add_item("Weekly", "Milk", Decimal::ONE, None)
        .unwrap();

    service.remove_list("Weekly").unwrap();
    assert!(service.get_list("Weekly").is_err());
    assert_eq!(repo.get_shopping_list_count().unwrap(), 0);
}

// ============================================================================
// Stats
// ============================================================================

#[test]
fn test_stats_overview_and_breakdown() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = StatsService::new(Arc::clone(&repo));

    let groceries = repo.get_category_by_name("Groceries").unwrap().unwrap();
    let dining = repo.get_category_by_name("Dining").unwrap().unwrap();

    let mut m1 = create_test_movement(MovementKind::Expense, 7500, date(2025, 3, 3));
    m1.category_id = Some(groceries.id);
    let mut m2 = create_test_movement(MovementKind::Expense, 2500, date(2025, 3, 20));
    m2.category_id = Some(dining.id);
    let m3 = create_test_movement(MovementKind::Income, 200000, date(2025, 3, 1));
    let outside = create_test_movement(MovementKind::Expense, 99999, date(2025, 4, 2));
    let mut deleted = create_test_movement(MovementKind::Expense, 88888, date(2025, 3, 5));
    deleted.deleted_at = Some(Utc::now());

    for m in [&m1, &m2, &m3, &outside, &deleted] {
        repo.upsert_movement(m).unwrap();
    }

    let summaries = service
        .overview(date(2025, 3, 1), date(2025, 3, 31), Bucket::Month)
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].income, Decimal::new(200000, 2));
    // Soft-deleted and out-of-range movements are excluded
    assert_eq!(summaries[0].expense, Decimal::new(10000, 2));

    let shares = service
        .category_breakdown(date(2025, 3, 1), date(2025, 3, 31))
        .unwrap();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].category, "Groceries");
    assert!((shares[0].share - 0.75).abs() < 1e-9);
}

// ============================================================================
// Status, user, export
// ============================================================================

#[test]
fn test_status_summary_counts() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = StatusService::new(Arc::clone(&repo));

    repo.upsert_movement(&create_test_movement(
        MovementKind::Income,
        1000,
        date(2025, 3, 1),
    ))
    .unwrap();
    repo.upsert_movement(&create_test_movement(
        MovementKind::Expense,
        500,
        date(2025, 3, 2),
    ))
    .unwrap();

    let mut user = User::default();
    user.name = Some("Ana".to_string());
    user.default_currency = "MXN".to_string();
    repo.upsert_user(&user).unwrap();

    let status = service.get_status().unwrap();
    assert_eq!(status.total_movements, 2);
    assert_eq!(status.total_incomes, 1);
    assert_eq!(status.total_expenses, 1);
    assert_eq!(status.profile_name, Some("Ana".to_string()));
    assert_eq!(status.default_currency, Some("MXN".to_string()));
    assert_eq!(status.date_range.earliest, Some("2025-03-01".to_string()));
    assert_eq!(status.date_range.latest, Some("2025-03-02".to_string()));
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let service = ExportService::new(Arc::clone(&repo));

    let groceries = repo.get_category_by_name("Groceries").unwrap().unwrap();
    let mut movement = create_test_movement(MovementKind::Expense, 4250, date(2025, 3, 14));
    movement.category_id = Some(groceries.id);
    movement.description = Some("Corner Market".to_string());
    repo.upsert_movement(&movement).unwrap();

    let output = temp_dir.path().join("movements.csv");
    let result = service
        .export_movements(&output, &MovementFilter::default())
        .unwrap();
    assert_eq!(result.rows, 1);

    let content = std::fs::read_to_string(&output).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("date,kind,amount,currency,category,description,source")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("2025-03-14,expense,42.50,USD,Groceries,Corner Market"));
}

// ============================================================================
// Demo seed
// ============================================================================

#[test]
fn test_demo_data_seeds_consistent_ledger() {
    let temp_dir = TempDir::new().unwrap();
    std::env::remove_var("CENTAVO_DEMO_MODE");
    let demo = centavo_core::services::DemoService::new(temp_dir.path());
    demo.enable().unwrap();
    assert!(demo.is_enabled().unwrap());

    let repo = DuckDbRepository::new(&temp_dir.path().join("demo.duckdb")).unwrap();
    assert!(repo.get_movement_count().unwrap() > 100);
    assert_eq!(repo.get_receipt_count().unwrap(), 1);
    assert_eq!(repo.get_goal_count().unwrap(), 1);
    assert_eq!(repo.get_shopping_list_count().unwrap(), 1);
    assert!(repo.get_budget_count().unwrap() >= 4);

    // The seeded goal has contributions linked by goal_id
    let goal = repo.get_goal_by_name("Vacation fund").unwrap().unwrap();
    let saved = repo.get_saved_for_goal(&goal.id.to_string()).unwrap();
    assert!(saved > Decimal::ZERO);

    demo.disable(true).unwrap();
    assert!(!demo.is_enabled().unwrap());
    assert!(!temp_dir.path().join("demo.duckdb").exists());
}
