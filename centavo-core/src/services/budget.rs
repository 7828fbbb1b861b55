//! Budget service - month-scoped category spending limits

use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::budget::normalize_month;
use crate::domain::{Budget, BudgetStatus};

/// Budget service
pub struct BudgetService {
    repository: Arc<DuckDbRepository>,
}

impl BudgetService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Set or update the budget for (category, month)
    pub fn set_budget(&self, category_name: &str, month: NaiveDate, amount: Decimal) -> Result<BudgetProgress> {
        let category = self
            .repository
            .get_category_by_name(category_name)?
            .ok_or_else(|| anyhow::anyhow!("Category not found: {}", category_name))?;

        let budget = Budget::new(Uuid::new_v4(), category.id, month, amount);
        budget
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid budget: {}", e))?;

        self.repository.upsert_budget(&budget)?;

        // Re-read so an update reports the surviving row, not the discarded insert
        let stored = self
            .repository
            .get_budget(&category.id.to_string(), budget.month)?
            .unwrap_or(budget);

        self.progress_for(&stored, &category.name)
    }

    /// Progress report for every budget in a month
    pub fn month_status(&self, month: NaiveDate) -> Result<Vec<BudgetProgress>> {
        let month = normalize_month(month);
        let budgets = self.repository.get_budgets_for_month(month)?;
        let categories = self.repository.get_categories()?;

        let mut report = Vec::new();
        for budget in &budgets {
            let name = categories
                .iter()
                .find(|c| c.id == budget.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| budget.category_id.to_string());
            report.push(self.progress_for(budget, &name)?);
        }

        report.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(report)
    }

    /// Remove the budget for (category, month); returns false when absent
    pub fn remove_budget(&self, category_name: &str, month: NaiveDate) -> Result<bool> {
        let category = self
            .repository
            .get_category_by_name(category_name)?
            .ok_or_else(|| anyhow::anyhow!("Category not found: {}", category_name))?;

        self.repository
            .delete_budget(&category.id.to_string(), normalize_month(month))
    }

    fn progress_for(&self, budget: &Budget, category_name: &str) -> Result<BudgetProgress> {
        let from = budget.month;
        let to = last_day_of_month(budget.month);
        let spent = self
            .repository
            .get_spent_for_category(&budget.category_id.to_string(), from, to)?;

        let ratio = budget.ratio(spent);
        Ok(BudgetProgress {
            budget_id: budget.id.to_string(),
            category: category_name.to_string(),
            month: budget.month.format("%Y-%m").to_string(),
            amount: budget.amount,
            spent,
            remaining: (budget.amount - spent).max(Decimal::ZERO),
            ratio,
            status: budget.status(spent),
        })
    }
}

/// Last day of the month containing `month` (itself a first-of-month date)
///
/// Computed in Rust; the ICU date functions are not available in the bundled
/// DuckDB build.
fn last_day_of_month(month: NaiveDate) -> NaiveDate {
    let next_month = if month.month() == 12 {
        NaiveDate::from_ymd_opt(month.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month.year(), month.month() + 1, 1)
    };
    next_month.map(|d| d - Duration::days(1)).unwrap_or(month)
}

/// Progress for one budget
#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgress {
    pub budget_id: String,
    pub category: String,
    /// YYYY-MM
    pub month: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub ratio: f64,
    pub status: BudgetStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
        assert_eq!(
            last_day_of_month(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            last_day_of_month(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }
}
