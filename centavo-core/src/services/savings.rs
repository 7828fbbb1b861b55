//! Savings service - goals and contributions

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::{GoalProgress, MovementKind, SavingsGoal};
use crate::services::movement::{MovementService, NewMovement};

/// Savings service
pub struct SavingsService {
    repository: Arc<DuckDbRepository>,
    movement_service: MovementService,
}

impl SavingsService {
    pub fn new(repository: Arc<DuckDbRepository>, movement_service: MovementService) -> Self {
        Self {
            repository,
            movement_service,
        }
    }

    /// Create a new savings goal
    pub fn create_goal(
        &self,
        name: &str,
        target_amount: Decimal,
        deadline: Option<NaiveDate>,
    ) -> Result<SavingsGoal> {
        if self.repository.get_goal_by_name(name)?.is_some() {
            anyhow::bail!("Goal already exists: {}", name);
        }

        let mut goal = SavingsGoal::new(Uuid::new_v4(), name.trim(), target_amount);
        goal.deadline = deadline;
        goal.validate()
            .map_err(|e| anyhow::anyhow!("Invalid goal: {}", e))?;

        self.repository.upsert_goal(&goal)?;
        Ok(goal)
    }

    /// List all goals with derived progress
    pub fn list_goals(&self) -> Result<Vec<GoalSummary>> {
        let goals = self.repository.get_goals()?;
        goals.iter().map(|g| self.summary_for(g)).collect()
    }

    /// Progress for one goal, referenced by name
    pub fn goal_progress(&self, name: &str) -> Result<GoalSummary> {
        let goal = self.resolve_goal(name)?;
        self.summary_for(&goal)
    }

    /// Record a contribution: a saving movement linked to the goal
    pub fn contribute(
        &self,
        name: &str,
        amount: Decimal,
        date: Option<NaiveDate>,
    ) -> Result<GoalSummary> {
        let goal = self.resolve_goal(name)?;

        let mut input = NewMovement::new(MovementKind::Saving, amount);
        input.description = Some(format!("Contribution to {}", goal.name));
        input.date = date;
        input.goal_id = Some(goal.id);
        self.movement_service.add(input)?;

        self.summary_for(&goal)
    }

    /// Delete a goal
    ///
    /// Linked saving movements stay in the ledger; they are detached from
    /// the goal first so no dangling reference remains.
    pub fn remove_goal(&self, name: &str) -> Result<()> {
        let goal = self.resolve_goal(name)?;
        self.repository.clear_goal_links(&goal.id.to_string())?;
        self.repository.delete_goal(&goal.id.to_string())?;
        Ok(())
    }

    fn resolve_goal(&self, name: &str) -> Result<SavingsGoal> {
        self.repository
            .get_goal_by_name(name)?
            .ok_or_else(|| anyhow::anyhow!("Goal not found: {}", name))
    }

    fn summary_for(&self, goal: &SavingsGoal) -> Result<GoalSummary> {
        let saved = self.repository.get_saved_for_goal(&goal.id.to_string())?;
        Ok(GoalSummary {
            id: goal.id.to_string(),
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            deadline: goal.deadline.map(|d| d.format("%Y-%m-%d").to_string()),
            progress: goal.progress(saved),
        })
    }
}

/// A goal with its derived progress
#[derive(Debug, Clone, Serialize)]
pub struct GoalSummary {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<String>,
    pub progress: GoalProgress,
}
