//! Movement service - record and list incomes, expenses, and savings

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::{DuckDbRepository, MovementFilter};
use crate::domain::{Category, Movement, MovementKind, Source};

/// Input for recording a movement
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub kind: MovementKind,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub description: Option<String>,
    /// Category referenced by name, resolved case-insensitively
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub source: Option<Source>,
    pub goal_id: Option<Uuid>,
    pub receipt_id: Option<Uuid>,
}

impl NewMovement {
    pub fn new(kind: MovementKind, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            currency: None,
            description: None,
            category: None,
            date: None,
            source: None,
            goal_id: None,
            receipt_id: None,
        }
    }
}

/// Movement service for recording and listing movements
pub struct MovementService {
    repository: Arc<DuckDbRepository>,
    default_currency: String,
}

impl MovementService {
    pub fn new(repository: Arc<DuckDbRepository>, default_currency: String) -> Self {
        Self {
            repository,
            default_currency,
        }
    }

    /// Record a new movement
    ///
    /// The currency defaults to the configured currency when absent from the
    /// input. Categories are referenced by name; an unknown name is an error
    /// rather than an implicit create.
    pub fn add(&self, input: NewMovement) -> Result<MovementRecord> {
        if input.amount <= Decimal::ZERO {
            anyhow::bail!("Amount must be positive");
        }

        let category = match &input.category {
            Some(name) => Some(self.resolve_category(name)?),
            None => None,
        };

        let mut movement = Movement::new(
            Uuid::new_v4(),
            input.kind,
            input.amount,
            input.date.unwrap_or_else(|| Utc::now().date_naive()),
        );
        movement.currency = Movement::normalize_currency(
            input.currency.as_deref().unwrap_or(&self.default_currency),
        );
        movement.description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        movement.category_id = category.as_ref().map(|c| c.id);
        movement.source = match input.kind {
            MovementKind::Expense => Some(input.source.unwrap_or(Source::Manual)),
            _ => None,
        };
        movement.goal_id = input.goal_id;
        movement.receipt_id = input.receipt_id;

        movement
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid movement: {}", e))?;

        self.repository.upsert_movement(&movement)?;

        Ok(MovementRecord::from_movement(&movement, category.as_ref()))
    }

    /// List movements with optional filters, newest first
    pub fn list(&self, filter: &MovementFilter) -> Result<Vec<MovementRecord>> {
        let categories = self.repository.get_categories()?;
        let movements = self.repository.get_movements(filter)?;

        Ok(movements
            .iter()
            .map(|m| {
                let category = m
                    .category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id));
                MovementRecord::from_movement(m, category)
            })
            .collect())
    }

    /// Soft delete a movement by id
    pub fn remove(&self, id: &str) -> Result<()> {
        // Validate the id up front for a cleaner error than the DB's
        Uuid::parse_str(id).map_err(|_| anyhow::anyhow!("Invalid movement ID: {}", id))?;

        if !self.repository.soft_delete_movement(id)? {
            anyhow::bail!("Movement not found: {}", id);
        }
        Ok(())
    }

    /// Create a user-defined category
    pub fn add_category(&self, name: &str, kind: crate::domain::CategoryKind) -> Result<Category> {
        if self.repository.get_category_by_name(name)?.is_some() {
            anyhow::bail!("Category already exists: {}", name);
        }

        let category = Category::new(Uuid::new_v4(), name.trim(), kind);
        category
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid category: {}", e))?;
        self.repository.insert_category(&category)?;
        Ok(category)
    }

    /// List all categories
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.repository.get_categories()
    }

    fn resolve_category(&self, name: &str) -> Result<Category> {
        self.repository.get_category_by_name(name)?.ok_or_else(|| {
            anyhow::anyhow!(
                "Category not found: {}. Use 'cent new category' to create it.",
                name
            )
        })
    }
}

/// A movement joined with its category name for display
#[derive(Debug, Clone, Serialize)]
pub struct MovementRecord {
    pub id: String,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: String,
    pub source: Option<Source>,
}

impl MovementRecord {
    fn from_movement(movement: &Movement, category: Option<&Category>) -> Self {
        Self {
            id: movement.id.to_string(),
            kind: movement.kind,
            amount: movement.amount,
            currency: movement.currency.clone(),
            description: movement.description.clone(),
            category: category.map(|c| c.name.clone()),
            date: movement.movement_date.format("%Y-%m-%d").to_string(),
            source: movement.source,
        }
    }
}
