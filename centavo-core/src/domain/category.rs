//! Category domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a category applies to income or expense movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(CategoryKind::Income),
            "expense" => Some(CategoryKind::Expense),
            _ => None,
        }
    }
}

/// A movement category
///
/// A seed set of builtin categories ships with the schema; users can add
/// their own. Builtin categories cannot be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub builtin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(id: Uuid, name: impl Into<String>, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            kind,
            builtin: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("category name cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(CategoryKind::parse("Income"), Some(CategoryKind::Income));
        assert_eq!(CategoryKind::parse("expense"), Some(CategoryKind::Expense));
        assert_eq!(CategoryKind::parse("saving"), None);
    }

    #[test]
    fn test_category_validation() {
        let mut category = Category::new(Uuid::new_v4(), "Groceries", CategoryKind::Expense);
        assert!(category.validate().is_ok());

        category.name = "  ".to_string();
        assert!(category.validate().is_err());
    }
}
