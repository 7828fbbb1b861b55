//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{params, params_from_iter, Connection};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Budget, Category, CategoryKind, Movement, MovementKind, Receipt, ReceiptItem, SavingsGoal,
    ShoppingItem, ShoppingList, Source, User,
};
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Filters for listing movements
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub category_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Create a new DuckDB repository
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which can occur when multiple commands try to access the database
    /// simultaneously.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        // Exponential backoff: 50ms, 100ms, 200ms, 400ms
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[centavo] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    // Non-retryable error or max retries reached
                    return Err(e);
                }
            }
        }

        // Should only reach here if all retries failed
        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // IMPORTANT: Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;

        // Note: JSON extension is statically linked via Cargo feature "json"
        // ICU is NOT included - all date functions use Rust-computed dates

        Ok(conn)
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service.run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn get_db_size(&self) -> Result<u64> {
        let metadata = std::fs::metadata(&self.db_path)?;
        Ok(metadata.len())
    }

    // === Movement operations ===

    pub fn upsert_movement(&self, movement: &Movement) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sys_movements (movement_id, kind, amount, currency, description,
                                        category_id, movement_date, source, receipt_id, goal_id,
                                        created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (movement_id) DO UPDATE SET
                kind = EXCLUDED.kind,
                amount = EXCLUDED.amount,
                currency = EXCLUDED.currency,
                description = EXCLUDED.description,
                category_id = EXCLUDED.category_id,
                movement_date = EXCLUDED.movement_date,
                source = EXCLUDED.source,
                receipt_id = EXCLUDED.receipt_id,
                goal_id = EXCLUDED.goal_id,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at",
            params![
                movement.id.to_string(),
                movement.kind.as_str(),
                movement.amount.to_string().parse::<f64>().unwrap_or(0.0),
                movement.currency,
                movement.description,
                movement.category_id.map(|id| id.to_string()),
                movement.movement_date.to_string(),
                movement.source.map(|s| s.as_str()),
                movement.receipt_id.map(|id| id.to_string()),
                movement.goal_id.map(|id| id.to_string()),
                movement.created_at.to_rfc3339(),
                movement.updated_at.to_rfc3339(),
                movement.deleted_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    const MOVEMENT_COLUMNS: &'static str =
        "movement_id, kind, amount, currency, description, category_id,
         movement_date::VARCHAR, source, receipt_id, goal_id,
         created_at::VARCHAR, updated_at::VARCHAR";

    pub fn get_movement_by_id(&self, id: &str) -> Result<Option<Movement>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM sys_movements WHERE movement_id = ? AND deleted_at IS NULL",
            Self::MOVEMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let movement = stmt.query_row([id], |row| Ok(Self::row_to_movement(row))).ok();
        Ok(movement)
    }

    /// List movements, newest first, honoring the given filters
    pub fn get_movements(&self, filter: &MovementFilter) -> Result<Vec<Movement>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!(
            "SELECT {} FROM sys_movements WHERE deleted_at IS NULL",
            Self::MOVEMENT_COLUMNS
        );
        let mut params: Vec<String> = Vec::new();

        if let Some(kind) = filter.kind {
            sql.push_str(" AND kind = ?");
            params.push(kind.as_str().to_string());
        }
        if let Some(category_id) = filter.category_id {
            sql.push_str(" AND category_id = ?");
            params.push(category_id.to_string());
        }
        if let Some(from) = filter.from {
            sql.push_str(" AND movement_date >= ?");
            params.push(from.to_string());
        }
        if let Some(to) = filter.to {
            sql.push_str(" AND movement_date <= ?");
            params.push(to.to_string());
        }

        sql.push_str(" ORDER BY movement_date DESC, created_at DESC");

        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = conn.prepare(&sql)?;
        let movements = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                Ok(Self::row_to_movement(row))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(movements)
    }

    /// Soft delete a movement; returns false when no live row matched
    pub fn soft_delete_movement(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE sys_movements SET deleted_at = ?, updated_at = ?
             WHERE movement_id = ? AND deleted_at IS NULL",
            params![Utc::now().to_rfc3339(), Utc::now().to_rfc3339(), id],
        )?;
        Ok(changed > 0)
    }

    pub fn get_movement_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_movements WHERE deleted_at IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn get_movement_count_by_kind(&self, kind: MovementKind) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_movements WHERE kind = ? AND deleted_at IS NULL",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn get_movement_date_range(&self) -> Result<crate::services::DateRange> {
        let conn = self.conn.lock().unwrap();
        let result: (Option<String>, Option<String>) = conn.query_row(
            "SELECT
                MIN(movement_date)::VARCHAR,
                MAX(movement_date)::VARCHAR
             FROM sys_movements
             WHERE deleted_at IS NULL",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(crate::services::DateRange {
            earliest: result.0,
            latest: result.1,
        })
    }

    /// Sum of expense movements for a category within [from, to]
    pub fn get_spent_for_category(
        &self,
        category_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal> {
        let conn = self.conn.lock().unwrap();
        let spent: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM sys_movements
             WHERE kind = 'expense' AND category_id = ?
               AND movement_date >= ? AND movement_date <= ?
               AND deleted_at IS NULL",
            params![category_id, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(Decimal::try_from(spent).unwrap_or_default().round_dp(2))
    }

    /// Sum of saving movements linked to a goal
    pub fn get_saved_for_goal(&self, goal_id: &str) -> Result<Decimal> {
        let conn = self.conn.lock().unwrap();
        let saved: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM sys_movements
             WHERE kind = 'saving' AND goal_id = ? AND deleted_at IS NULL",
            params![goal_id],
            |row| row.get(0),
        )?;
        Ok(Decimal::try_from(saved).unwrap_or_default().round_dp(2))
    }

    /// Detach movements from a goal before the goal is deleted
    pub fn clear_goal_links(&self, goal_id: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE sys_movements SET goal_id = NULL, updated_at = CURRENT_TIMESTAMP
             WHERE goal_id = ?",
            params![goal_id],
        )?;
        Ok(changed)
    }

    fn row_to_movement(row: &duckdb::Row) -> Movement {
        // Column indices from MOVEMENT_COLUMNS:
        // 0: movement_id, 1: kind, 2: amount, 3: currency, 4: description,
        // 5: category_id, 6: movement_date, 7: source, 8: receipt_id, 9: goal_id,
        // 10: created_at, 11: updated_at
        let id_str: String = row.get(0).unwrap_or_default();
        let kind_str: String = row.get(1).unwrap_or_default();
        let amount: f64 = row.get(2).unwrap_or(0.0);
        let category_str: Option<String> = row.get(5).ok();
        let date_str: String = row.get(6).unwrap_or_default();
        let source_str: Option<String> = row.get(7).ok();
        let receipt_str: Option<String> = row.get(8).ok();
        let goal_str: Option<String> = row.get(9).ok();
        let created_str: String = row.get(10).unwrap_or_default();
        let updated_str: String = row.get(11).unwrap_or_default();

        Movement {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            kind: MovementKind::parse(&kind_str).unwrap_or(MovementKind::Expense),
            amount: Decimal::try_from(amount).unwrap_or_default().round_dp(2),
            currency: row.get(3).unwrap_or_else(|_| "USD".to_string()),
            description: row.get(4).ok(),
            category_id: category_str.and_then(|s| Uuid::parse_str(&s).ok()),
            movement_date: parse_date(&date_str),
            source: source_str.as_deref().and_then(Source::parse),
            receipt_id: receipt_str.and_then(|s| Uuid::parse_str(&s).ok()),
            goal_id: goal_str.and_then(|s| Uuid::parse_str(&s).ok()),
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
            deleted_at: None,
        }
    }

    // === Receipt operations ===

    /// Insert a receipt with its items
    ///
    /// Note: We intentionally don't wrap this in an explicit transaction because
    /// DuckDB has issues with FK constraint checking inside transactions.
    /// Each statement auto-commits; the receipt row goes in first so items
    /// never reference a missing receipt.
    pub fn insert_receipt(&self, receipt: &Receipt) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let extraction = receipt.extraction.as_ref().map(|v| v.to_string());

        conn.execute(
            "INSERT INTO sys_receipts (receipt_id, merchant, total, currency, purchased_date,
                                       fingerprint, extraction, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                receipt.id.to_string(),
                receipt.merchant,
                receipt.total.to_string().parse::<f64>().unwrap_or(0.0),
                receipt.currency,
                receipt.purchased_date.to_string(),
                receipt.fingerprint,
                extraction,
                receipt.created_at.to_rfc3339(),
                receipt.updated_at.to_rfc3339(),
            ],
        )?;

        for item in &receipt.items {
            conn.execute(
                "INSERT INTO sys_receipt_items (item_id, receipt_id, name, quantity, unit_price, line_total)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    item.id.to_string(),
                    receipt.id.to_string(),
                    item.name,
                    item.quantity.to_string().parse::<f64>().unwrap_or(1.0),
                    item.unit_price.to_string().parse::<f64>().unwrap_or(0.0),
                    item.line_total.to_string().parse::<f64>().unwrap_or(0.0),
                ],
            )?;
        }

        Ok(())
    }

    pub fn get_receipt_by_id(&self, id: &str) -> Result<Option<Receipt>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT receipt_id, merchant, total, currency, purchased_date::VARCHAR,
                    fingerprint, extraction, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_receipts WHERE receipt_id = ?",
        )?;

        let receipt = stmt.query_row([id], |row| Ok(Self::row_to_receipt(row))).ok();

        let Some(mut receipt) = receipt else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT item_id, receipt_id, name, quantity, unit_price, line_total
             FROM sys_receipt_items WHERE receipt_id = ?",
        )?;
        receipt.items = stmt
            .query_map([id], |row| Ok(Self::row_to_receipt_item(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(Some(receipt))
    }

    /// List receipts, newest purchase first, without their items
    pub fn get_receipts(&self, limit: usize) -> Result<Vec<Receipt>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT receipt_id, merchant, total, currency, purchased_date::VARCHAR,
                    fingerprint, extraction, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_receipts ORDER BY purchased_date DESC, created_at DESC LIMIT ?",
        )?;
        let receipts = stmt
            .query_map([limit as i64], |row| Ok(Self::row_to_receipt(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(receipts)
    }

    pub fn receipt_exists_by_fingerprint(&self, fingerprint: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_receipts WHERE fingerprint = ?",
            params![fingerprint],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn get_receipt_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_receipts", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_receipt(row: &duckdb::Row) -> Receipt {
        let id_str: String = row.get(0).unwrap_or_default();
        let total: f64 = row.get(2).unwrap_or(0.0);
        let date_str: String = row.get(4).unwrap_or_default();
        let extraction_json: Option<String> = row.get(6).ok();
        let created_str: String = row.get(7).unwrap_or_default();
        let updated_str: String = row.get(8).unwrap_or_default();

        Receipt {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            merchant: row.get(1).ok(),
            total: Decimal::try_from(total).unwrap_or_default().round_dp(2),
            currency: row.get(3).unwrap_or_else(|_| "USD".to_string()),
            purchased_date: parse_date(&date_str),
            fingerprint: row.get(5).ok(),
            extraction: extraction_json.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
            items: Vec::new(),
        }
    }

    fn row_to_receipt_item(row: &duckdb::Row) -> ReceiptItem {
        let id_str: String = row.get(0).unwrap_or_default();
        let receipt_str: String = row.get(1).unwrap_or_default();
        let quantity: f64 = row.get(3).unwrap_or(1.0);
        let unit_price: f64 = row.get(4).unwrap_or(0.0);
        let line_total: f64 = row.get(5).unwrap_or(0.0);

        ReceiptItem {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            receipt_id: Uuid::parse_str(&receipt_str).unwrap_or_else(|_| Uuid::new_v4()),
            name: row.get(2).unwrap_or_default(),
            quantity: Decimal::try_from(quantity).unwrap_or(Decimal::ONE),
            unit_price: Decimal::try_from(unit_price).unwrap_or_default().round_dp(2),
            line_total: Decimal::try_from(line_total).unwrap_or_default().round_dp(2),
        }
    }

    // === Category operations ===

    pub fn get_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT category_id, name, kind, builtin, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_categories ORDER BY kind, name",
        )?;

        let categories = stmt
            .query_map([], |row| Ok(Self::row_to_category(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(categories)
    }

    pub fn get_category_by_id(&self, id: &str) -> Result<Option<Category>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT category_id, name, kind, builtin, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_categories WHERE category_id = ?",
        )?;
        let category = stmt.query_row([id], |row| Ok(Self::row_to_category(row))).ok();
        Ok(category)
    }

    /// Look up a category by name, case-insensitive
    pub fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT category_id, name, kind, builtin, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_categories WHERE LOWER(name) = LOWER(?)",
        )?;
        let category = stmt
            .query_row([name.trim()], |row| Ok(Self::row_to_category(row)))
            .ok();
        Ok(category)
    }

    pub fn insert_category(&self, category: &Category) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sys_categories (category_id, name, kind, builtin, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                category.id.to_string(),
                category.name,
                category.kind.as_str(),
                category.builtin,
                category.created_at.to_rfc3339(),
                category.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn row_to_category(row: &duckdb::Row) -> Category {
        let id_str: String = row.get(0).unwrap_or_default();
        let kind_str: String = row.get(2).unwrap_or_default();
        let created_str: String = row.get(4).unwrap_or_default();
        let updated_str: String = row.get(5).unwrap_or_default();

        Category {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            name: row.get(1).unwrap_or_default(),
            kind: CategoryKind::parse(&kind_str).unwrap_or(CategoryKind::Expense),
            builtin: row.get::<_, Option<bool>>(3).ok().flatten().unwrap_or(false),
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        }
    }

    // === Budget operations ===

    /// Upsert a budget; budgets are unique per (category, month)
    pub fn upsert_budget(&self, budget: &Budget) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sys_budgets (budget_id, category_id, month, amount, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (category_id, month) DO UPDATE SET
                amount = EXCLUDED.amount,
                updated_at = EXCLUDED.updated_at",
            params![
                budget.id.to_string(),
                budget.category_id.to_string(),
                budget.month.to_string(),
                budget.amount.to_string().parse::<f64>().unwrap_or(0.0),
                budget.created_at.to_rfc3339(),
                budget.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_budgets_for_month(&self, month: NaiveDate) -> Result<Vec<Budget>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT budget_id, category_id, month::VARCHAR, amount, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_budgets WHERE month = ?",
        )?;
        let budgets = stmt
            .query_map([month.to_string()], |row| Ok(Self::row_to_budget(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(budgets)
    }

    pub fn get_budget(&self, category_id: &str, month: NaiveDate) -> Result<Option<Budget>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT budget_id, category_id, month::VARCHAR, amount, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_budgets WHERE category_id = ? AND month = ?",
        )?;
        let budget = stmt
            .query_row(params![category_id, month.to_string()], |row| {
                Ok(Self::row_to_budget(row))
            })
            .ok();
        Ok(budget)
    }

    pub fn delete_budget(&self, category_id: &str, month: NaiveDate) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM sys_budgets WHERE category_id = ? AND month = ?",
            params![category_id, month.to_string()],
        )?;
        Ok(changed > 0)
    }

    pub fn get_budget_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_budgets", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_budget(row: &duckdb::Row) -> Budget {
        let id_str: String = row.get(0).unwrap_or_default();
        let category_str: String = row.get(1).unwrap_or_default();
        let month_str: String = row.get(2).unwrap_or_default();
        let amount: f64 = row.get(3).unwrap_or(0.0);
        let created_str: String = row.get(4).unwrap_or_default();
        let updated_str: String = row.get(5).unwrap_or_default();

        Budget {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            category_id: Uuid::parse_str(&category_str).unwrap_or_else(|_| Uuid::new_v4()),
            month: parse_date(&month_str),
            amount: Decimal::try_from(amount).unwrap_or_default().round_dp(2),
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        }
    }

    // === Savings goal operations ===

    pub fn upsert_goal(&self, goal: &SavingsGoal) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sys_savings_goals (goal_id, name, target_amount, deadline, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (goal_id) DO UPDATE SET
                name = EXCLUDED.name,
                target_amount = EXCLUDED.target_amount,
                deadline = EXCLUDED.deadline,
                updated_at = EXCLUDED.updated_at",
            params![
                goal.id.to_string(),
                goal.name,
                goal.target_amount.to_string().parse::<f64>().unwrap_or(0.0),
                goal.deadline.map(|d| d.to_string()),
                goal.created_at.to_rfc3339(),
                goal.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_goals(&self) -> Result<Vec<SavingsGoal>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT goal_id, name, target_amount, deadline::VARCHAR, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_savings_goals ORDER BY name",
        )?;
        let goals = stmt
            .query_map([], |row| Ok(Self::row_to_goal(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(goals)
    }

    /// Look up a goal by name, case-insensitive
    pub fn get_goal_by_name(&self, name: &str) -> Result<Option<SavingsGoal>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT goal_id, name, target_amount, deadline::VARCHAR, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_savings_goals WHERE LOWER(name) = LOWER(?)",
        )?;
        let goal = stmt
            .query_row([name.trim()], |row| Ok(Self::row_to_goal(row)))
            .ok();
        Ok(goal)
    }

    pub fn delete_goal(&self, goal_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM sys_savings_goals WHERE goal_id = ?",
            params![goal_id],
        )?;
        Ok(changed > 0)
    }

    pub fn get_goal_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sys_savings_goals", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_goal(row: &duckdb::Row) -> SavingsGoal {
        let id_str: String = row.get(0).unwrap_or_default();
        let target: f64 = row.get(2).unwrap_or(0.0);
        let deadline_str: Option<String> = row.get(3).ok();
        let created_str: String = row.get(4).unwrap_or_default();
        let updated_str: String = row.get(5).unwrap_or_default();

        SavingsGoal {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            name: row.get(1).unwrap_or_default(),
            target_amount: Decimal::try_from(target).unwrap_or_default().round_dp(2),
            deadline: deadline_str
                .filter(|s| !s.is_empty())
                .map(|s| parse_date(&s)),
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        }
    }

    // === Shopping list operations ===

    pub fn insert_shopping_list(&self, list: &ShoppingList) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sys_shopping_lists (list_id, name, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
            params![
                list.id.to_string(),
                list.name,
                list.created_at.to_rfc3339(),
                list.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_shopping_lists(&self) -> Result<Vec<ShoppingList>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT list_id, name, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_shopping_lists ORDER BY created_at",
        )?;
        let mut lists: Vec<ShoppingList> = stmt
            .query_map([], |row| Ok(Self::row_to_shopping_list(row)))?
            .filter_map(|r| r.ok())
            .collect();
        drop(stmt);

        for list in &mut lists {
            list.items = Self::items_for_list(&conn, &list.id.to_string())?;
        }

        Ok(lists)
    }

    /// Look up a shopping list by name, case-insensitive, with items
    pub fn get_shopping_list_by_name(&self, name: &str) -> Result<Option<ShoppingList>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT list_id, name, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_shopping_lists WHERE LOWER(name) = LOWER(?)",
        )?;
        let list = stmt
            .query_row([name.trim()], |row| Ok(Self::row_to_shopping_list(row)))
            .ok();
        drop(stmt);

        let Some(mut list) = list else {
            return Ok(None);
        };
        list.items = Self::items_for_list(&conn, &list.id.to_string())?;
        Ok(Some(list))
    }

    fn items_for_list(conn: &Connection, list_id: &str) -> Result<Vec<ShoppingItem>> {
        let mut stmt = conn.prepare(
            "SELECT item_id, list_id, name, quantity, unit_price, checked,
                    created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_shopping_items WHERE list_id = ? ORDER BY created_at",
        )?;
        let items = stmt
            .query_map([list_id], |row| Ok(Self::row_to_shopping_item(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(items)
    }

    pub fn upsert_shopping_item(&self, item: &ShoppingItem) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sys_shopping_items (item_id, list_id, name, quantity, unit_price, checked,
                                             created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (item_id) DO UPDATE SET
                name = EXCLUDED.name,
                quantity = EXCLUDED.quantity,
                unit_price = EXCLUDED.unit_price,
                checked = EXCLUDED.checked,
                updated_at = EXCLUDED.updated_at",
            params![
                item.id.to_string(),
                item.list_id.to_string(),
                item.name,
                item.quantity.to_string().parse::<f64>().unwrap_or(1.0),
                item.unit_price
                    .map(|p| p.to_string().parse::<f64>().unwrap_or(0.0)),
                item.checked,
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn set_shopping_item_checked(&self, item_id: &str, checked: bool) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE sys_shopping_items SET checked = ?, updated_at = CURRENT_TIMESTAMP
             WHERE item_id = ?",
            params![checked, item_id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_shopping_item(&self, item_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM sys_shopping_items WHERE item_id = ?",
            params![item_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a shopping list and all its items
    ///
    /// Items go first so no row ever references a missing list.
    pub fn delete_shopping_list(&self, list_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM sys_shopping_items WHERE list_id = ?",
            params![list_id],
        )?;
        conn.execute(
            "DELETE FROM sys_shopping_lists WHERE list_id = ?",
            params![list_id],
        )?;
        Ok(())
    }

    pub fn get_shopping_list_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sys_shopping_lists", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_shopping_list(row: &duckdb::Row) -> ShoppingList {
        let id_str: String = row.get(0).unwrap_or_default();
        let created_str: String = row.get(2).unwrap_or_default();
        let updated_str: String = row.get(3).unwrap_or_default();

        ShoppingList {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            name: row.get(1).unwrap_or_default(),
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
            items: Vec::new(),
        }
    }

    fn row_to_shopping_item(row: &duckdb::Row) -> ShoppingItem {
        let id_str: String = row.get(0).unwrap_or_default();
        let list_str: String = row.get(1).unwrap_or_default();
        let quantity: f64 = row.get(3).unwrap_or(1.0);
        let unit_price: Option<f64> = row.get::<_, Option<f64>>(4).ok().flatten();
        let created_str: String = row.get(6).unwrap_or_default();
        let updated_str: String = row.get(7).unwrap_or_default();

        ShoppingItem {
            id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
            list_id: Uuid::parse_str(&list_str).unwrap_or_else(|_| Uuid::new_v4()),
            name: row.get(2).unwrap_or_default(),
            quantity: Decimal::try_from(quantity).unwrap_or(Decimal::ONE),
            unit_price: unit_price.map(|p| Decimal::try_from(p).unwrap_or_default().round_dp(2)),
            checked: row.get::<_, Option<bool>>(5).ok().flatten().unwrap_or(false),
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        }
    }

    // === User profile operations ===

    pub fn get_user(&self) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, name, default_currency, created_at::VARCHAR, updated_at::VARCHAR
             FROM sys_user LIMIT 1",
        )?;
        let user = stmt
            .query_row([], |row| {
                let id_str: String = row.get(0).unwrap_or_default();
                let created_str: String = row.get(3).unwrap_or_default();
                let updated_str: String = row.get(4).unwrap_or_default();
                Ok(User {
                    id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
                    name: row.get(1).ok(),
                    default_currency: row.get(2).unwrap_or_else(|_| "USD".to_string()),
                    created_at: parse_timestamp(&created_str),
                    updated_at: parse_timestamp(&updated_str),
                })
            })
            .ok();
        Ok(user)
    }

    pub fn upsert_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sys_user (user_id, name, default_currency, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                default_currency = EXCLUDED.default_currency,
                updated_at = EXCLUDED.updated_at",
            params![
                user.id.to_string(),
                user.name,
                user.default_currency,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // === Integration operations ===

    pub fn get_integrations(&self) -> Result<Vec<Integration>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT integration_name, integration_settings FROM sys_integrations")?;

        let integrations = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let settings_json: String = row.get(1)?;
                let settings: serde_json::Value =
                    serde_json::from_str(&settings_json).unwrap_or(serde_json::json!({}));
                Ok(Integration { name, settings })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(integrations)
    }

    pub fn upsert_integration(&self, name: &str, settings: &serde_json::Value) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let settings_json = serde_json::to_string(settings)?;
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO sys_integrations (integration_name, integration_settings, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (integration_name) DO UPDATE SET
                integration_settings = EXCLUDED.integration_settings,
                updated_at = EXCLUDED.updated_at",
            params![name, settings_json, now, now],
        )?;

        Ok(())
    }

    pub fn delete_integration(&self, name: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM sys_integrations WHERE integration_name = ?",
            params![name],
        )?;
        Ok(rows > 0)
    }
}

/// Integration info
#[derive(Debug, Clone)]
pub struct Integration {
    pub name: String,
    pub settings: serde_json::Value,
}

// Helper functions

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // DuckDB may render TIMESTAMP columns without a zone suffix
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error(
            "The process cannot access the file because it is being used by another process"
        ));
        assert!(is_retryable_error("Resource temporarily unavailable"));
        assert!(is_retryable_error("database is locked"));
        assert!(!is_retryable_error("Permission denied"));
        assert!(!is_retryable_error("no such table: sys_movements"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2025-03-14T12:30:00+00:00");
        assert_eq!(rfc.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());

        let duck = parse_timestamp("2025-03-14 12:30:00.123");
        assert_eq!(duck.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_date_fallback() {
        assert_eq!(
            parse_date("2025-03-14"),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
        // Malformed dates fall back to today rather than failing the row
        let today = Utc::now().date_naive();
        assert_eq!(parse_date("not-a-date"), today);
    }
}
