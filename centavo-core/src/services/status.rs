//! Status service - ledger summary

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::MovementKind;

/// Status service for ledger summaries
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let user = self.repository.get_user()?;
        let integrations = self.repository.get_integrations()?;
        let date_range = self.repository.get_movement_date_range()?;

        Ok(StatusSummary {
            profile_name: user.as_ref().and_then(|u| u.name.clone()),
            default_currency: user.map(|u| u.default_currency),
            total_movements: self.repository.get_movement_count()?,
            total_incomes: self.repository.get_movement_count_by_kind(MovementKind::Income)?,
            total_expenses: self.repository.get_movement_count_by_kind(MovementKind::Expense)?,
            total_savings: self.repository.get_movement_count_by_kind(MovementKind::Saving)?,
            total_receipts: self.repository.get_receipt_count()?,
            total_budgets: self.repository.get_budget_count()?,
            total_goals: self.repository.get_goal_count()?,
            total_shopping_lists: self.repository.get_shopping_list_count()?,
            integration_names: integrations.iter().map(|i| i.name.clone()).collect(),
            date_range,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub profile_name: Option<String>,
    pub default_currency: Option<String>,
    pub total_movements: i64,
    pub total_incomes: i64,
    pub total_expenses: i64,
    pub total_savings: i64,
    pub total_receipts: i64,
    pub total_budgets: i64,
    pub total_goals: i64,
    pub total_shopping_lists: i64,
    pub integration_names: Vec<String>,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}
