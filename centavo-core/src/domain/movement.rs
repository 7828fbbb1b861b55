//! Movement domain model
//!
//! A movement is a single financial transaction: an income, an expense, or a
//! saving. Amounts are stored non-negative; the kind determines the sign in
//! aggregations.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback currency when neither the input nor the user profile carries one
pub const DEFAULT_CURRENCY: &str = "USD";

/// The three kinds of movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Income,
    Expense,
    Saving,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Income => "income",
            MovementKind::Expense => "expense",
            MovementKind::Saving => "saving",
        }
    }

    /// Parse a kind from its lowercase database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(MovementKind::Income),
            "expense" => Some(MovementKind::Expense),
            "saving" | "savings" => Some(MovementKind::Saving),
            _ => None,
        }
    }
}

/// Where an expense entry came from
///
/// `Item` means a single manually picked item, `Receipt` a multi-item scanned
/// receipt, `Voice` a transcribed voice note, `Manual` a plain form entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Manual,
    Item,
    Receipt,
    Voice,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Manual => "manual",
            Source::Item => "item",
            Source::Receipt => "receipt",
            Source::Voice => "voice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Some(Source::Manual),
            "item" => Some(Source::Item),
            "receipt" => Some(Source::Receipt),
            "voice" => Some(Source::Voice),
            _ => None,
        }
    }
}

/// A single financial movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub kind: MovementKind,
    /// Always non-negative; the kind carries the direction
    pub amount: Decimal,
    /// ISO 4217 currency code, normalized to uppercase
    pub currency: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub movement_date: NaiveDate,
    /// Entry channel, expenses only
    pub source: Option<Source>,
    /// Backing receipt for scanned expenses
    pub receipt_id: Option<Uuid>,
    /// Target goal for saving movements
    pub goal_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Movement {
    /// Create a new movement with required fields
    pub fn new(
        id: Uuid,
        kind: MovementKind,
        amount: Decimal,
        movement_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            description: None,
            category_id: None,
            movement_date,
            source: None,
            receipt_id: None,
            goal_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Normalize currency code to uppercase
    pub fn normalize_currency(currency: &str) -> String {
        currency.trim().to_uppercase()
    }

    /// Validate movement data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.amount.is_sign_negative() {
            return Err("amount cannot be negative");
        }
        if self.currency.trim().is_empty() {
            return Err("currency cannot be empty");
        }
        if self.goal_id.is_some() && self.kind != MovementKind::Saving {
            return Err("only saving movements can target a goal");
        }
        if self.source.is_some() && self.kind != MovementKind::Expense {
            return Err("only expenses carry a source");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_normalization() {
        assert_eq!(Movement::normalize_currency("usd"), "USD");
        assert_eq!(Movement::normalize_currency(" eur "), "EUR");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(MovementKind::parse("income"), Some(MovementKind::Income));
        assert_eq!(MovementKind::parse("Expense"), Some(MovementKind::Expense));
        assert_eq!(MovementKind::parse("savings"), Some(MovementKind::Saving));
        assert_eq!(MovementKind::parse("transfer"), None);
    }

    #[test]
    fn test_movement_validation() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut movement = Movement::new(
            Uuid::new_v4(),
            MovementKind::Expense,
            Decimal::new(1250, 2),
            date,
        );
        assert!(movement.validate().is_ok());

        movement.amount = Decimal::new(-1250, 2);
        assert!(movement.validate().is_err());
    }

    #[test]
    fn test_goal_link_only_on_savings() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut movement = Movement::new(
            Uuid::new_v4(),
            MovementKind::Expense,
            Decimal::new(500, 2),
            date,
        );
        movement.goal_id = Some(Uuid::new_v4());
        assert!(movement.validate().is_err());

        movement.kind = MovementKind::Saving;
        assert!(movement.validate().is_ok());
    }

    #[test]
    fn test_source_only_on_expenses() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut movement = Movement::new(
            Uuid::new_v4(),
            MovementKind::Income,
            Decimal::new(500, 2),
            date,
        );
        movement.source = Some(Source::Receipt);
        assert!(movement.validate().is_err());
    }
}
