//! Savings goal domain model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings goal
///
/// The saved amount is never stored on the goal; it is derived from saving
/// movements linked via goal_id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(id: Uuid, name: impl Into<String>, target_amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            target_amount,
            deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("goal name cannot be empty");
        }
        if self.target_amount <= Decimal::ZERO {
            return Err("target amount must be positive");
        }
        Ok(())
    }

    /// Progress toward the target for a given saved amount
    pub fn progress(&self, saved: Decimal) -> GoalProgress {
        let remaining = (self.target_amount - saved).max(Decimal::ZERO);
        let ratio = if self.target_amount > Decimal::ZERO {
            (saved / self.target_amount).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };
        let days_remaining = self
            .deadline
            .map(|d| (d - Utc::now().date_naive()).num_days());

        GoalProgress {
            saved,
            remaining,
            ratio,
            reached: saved >= self.target_amount,
            days_remaining,
        }
    }
}

/// Derived progress for a goal
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub saved: Decimal,
    pub remaining: Decimal,
    pub ratio: f64,
    pub reached: bool,
    /// Days until the deadline; negative when past due, None without a deadline
    pub days_remaining: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_validation() {
        let mut goal = SavingsGoal::new(Uuid::new_v4(), "Vacation", Decimal::new(100000, 2));
        assert!(goal.validate().is_ok());

        goal.target_amount = Decimal::ZERO;
        assert!(goal.validate().is_err());
    }

    #[test]
    fn test_progress() {
        let goal = SavingsGoal::new(Uuid::new_v4(), "Vacation", Decimal::new(100000, 2));

        let progress = goal.progress(Decimal::new(25000, 2));
        assert_eq!(progress.remaining, Decimal::new(75000, 2));
        assert!((progress.ratio - 0.25).abs() < 1e-9);
        assert!(!progress.reached);

        let progress = goal.progress(Decimal::new(120000, 2));
        assert_eq!(progress.remaining, Decimal::ZERO);
        assert!(progress.reached);
    }
}
