//! Budget domain model

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Budget health derived from the spent/amount ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    /// Thresholds: below 80% on track, 80% to 100% warning, at or over 100% exceeded
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.0 {
            BudgetStatus::Exceeded
        } else if ratio >= 0.8 {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on_track",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Exceeded => "exceeded",
        }
    }
}

/// A month-scoped spending limit for one category
///
/// Budgets are unique per (category, month); `month` is always the first
/// day of the month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub month: NaiveDate,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(id: Uuid, category_id: Uuid, month: NaiveDate, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            category_id,
            month: normalize_month(month),
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.amount <= Decimal::ZERO {
            return Err("budget amount must be positive");
        }
        Ok(())
    }

    /// Ratio of spent to budgeted, saturating at 0 for a zero amount
    pub fn ratio(&self, spent: Decimal) -> f64 {
        if self.amount <= Decimal::ZERO {
            return 0.0;
        }
        (spent / self.amount).to_f64().unwrap_or(0.0)
    }

    /// Status for a given spent amount
    pub fn status(&self, spent: Decimal) -> BudgetStatus {
        BudgetStatus::from_ratio(self.ratio(spent))
    }
}

/// Clamp a date to the first day of its month
pub fn normalize_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse a YYYY-MM month string into its first day
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return Some(date);
    }
    // Also accept a full date, clamped to its month
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(normalize_month)
}
