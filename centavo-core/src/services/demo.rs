//! Demo service - manage demo mode
//!
//! Demo mode provides sample data for testing and onboarding without
//! touching the real ledger. It uses a separate database file and the
//! canned demo analysis provider.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::adapters::demo::{
    generate_demo_budgets, generate_demo_goal, generate_demo_movements, generate_demo_receipt,
    generate_demo_shopping_list,
};
use crate::adapters::duckdb::DuckDbRepository;
use crate::config::Config;

/// Demo service for managing demo mode
pub struct DemoService {
    centavo_dir: PathBuf,
}

impl DemoService {
    pub fn new(centavo_dir: &Path) -> Self {
        Self {
            centavo_dir: centavo_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.centavo_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// This will:
    /// 1. Delete any existing demo database (fresh start)
    /// 2. Enable demo mode in config
    /// 3. Create demo database with sample data
    pub fn enable(&self) -> Result<()> {
        // Delete existing demo database for a fresh start
        let demo_db = self.centavo_dir.join("demo.duckdb");
        let demo_wal = self.centavo_dir.join("demo.duckdb.wal");
        if demo_db.exists() {
            std::fs::remove_file(&demo_db)?;
        }
        if demo_wal.exists() {
            std::fs::remove_file(&demo_wal)?;
        }

        // Enable demo mode in config
        let mut config = Config::load(&self.centavo_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.centavo_dir)?;

        // Create demo database and populate with data
        let repository = Arc::new(DuckDbRepository::new(&demo_db)?);
        repository.ensure_schema()?;

        // Demo analysis integration so scan/voice work offline
        repository.upsert_integration("demo", &serde_json::json!({}))?;

        // Goal first so movement links resolve
        repository.upsert_goal(&generate_demo_goal())?;

        for movement in generate_demo_movements() {
            repository.upsert_movement(&movement)?;
        }

        let (receipt, movement) = generate_demo_receipt();
        repository.insert_receipt(&receipt)?;
        repository.upsert_movement(&movement)?;

        for budget in generate_demo_budgets() {
            repository.upsert_budget(&budget)?;
        }

        let list = generate_demo_shopping_list();
        repository.insert_shopping_list(&list)?;
        for item in &list.items {
            repository.upsert_shopping_item(item)?;
        }

        Ok(())
    }

    /// Disable demo mode
    ///
    /// This will:
    /// 1. Disable demo mode in config
    /// 2. Optionally delete demo database (if clean = true)
    pub fn disable(&self, clean: bool) -> Result<()> {
        // Disable demo mode in config
        let mut config = Config::load(&self.centavo_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.centavo_dir)?;

        // Optionally clean up demo database
        if clean {
            let demo_db = self.centavo_dir.join("demo.duckdb");
            let demo_wal = self.centavo_dir.join("demo.duckdb.wal");
            if demo_db.exists() {
                std::fs::remove_file(&demo_db)?;
            }
            if demo_wal.exists() {
                std::fs::remove_file(&demo_wal)?;
            }
        }

        Ok(())
    }
}
