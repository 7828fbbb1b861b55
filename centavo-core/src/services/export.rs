//! Export service - CSV export of movements

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::adapters::duckdb::{DuckDbRepository, MovementFilter};

/// Export service
pub struct ExportService {
    repository: Arc<DuckDbRepository>,
}

impl ExportService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Write movements matching the filter to a CSV file
    ///
    /// Columns: date, kind, amount, currency, category, description, source.
    /// Rows are newest first, matching the movement listing.
    pub fn export_movements(&self, output: &Path, filter: &MovementFilter) -> Result<ExportResult> {
        let categories = self.repository.get_categories()?;
        let movements = self.repository.get_movements(filter)?;

        let mut writer = csv::Writer::from_path(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;

        writer.write_record(["date", "kind", "amount", "currency", "category", "description", "source"])?;

        for movement in &movements {
            let category = movement
                .category_id
                .and_then(|id| categories.iter().find(|c| c.id == id))
                .map(|c| c.name.as_str())
                .unwrap_or("");

            let date = movement.movement_date.format("%Y-%m-%d").to_string();
            let amount = format!("{:.2}", movement.amount);
            writer.write_record([
                date.as_str(),
                movement.kind.as_str(),
                amount.as_str(),
                movement.currency.as_str(),
                category,
                movement.description.as_deref().unwrap_or(""),
                movement.source.map(|s| s.as_str()).unwrap_or(""),
            ])?;
        }

        writer.flush()?;

        Ok(ExportResult {
            path: output.to_path_buf(),
            rows: movements.len(),
        })
    }
}

/// Result of an export
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub rows: usize,
}
