//! Centavo Core - Business logic for personal finance tracking
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Movement, Receipt, Budget, etc.)
//! - **ports**: Trait definitions for external dependencies (DocumentAnalysisProvider)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, cloud analysis, demo)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, RepositoryResult};
pub use services::{EntryPoint, LogEvent, LoggingService};
pub use domain::{
    Budget, BudgetStatus, Category, CategoryKind, Movement, MovementKind, Receipt, ReceiptItem,
    SavingsGoal, ShoppingItem, ShoppingList, Source, User,
};

/// Main context for Centavo operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
pub struct CentavoContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub status_service: StatusService,
    pub movement_service: MovementService,
    pub stats_service: StatsService,
    pub budget_service: BudgetService,
    pub savings_service: SavingsService,
    pub shopping_service: ShoppingService,
    pub analysis_service: AnalysisService,
    pub export_service: ExportService,
}

impl CentavoContext {
    /// Create a new Centavo context
    pub fn new(centavo_dir: &Path) -> Result<Self> {
        let config = Config::load(centavo_dir)?;

        // Determine which database file to use
        let db_filename = if config.demo_mode {
            "demo.duckdb"
        } else {
            "centavo.duckdb"
        };

        let db_path = centavo_dir.join(db_filename);
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        // The user profile's currency wins over the settings file default
        let default_currency = repository
            .get_user()?
            .map(|u| u.default_currency)
            .unwrap_or_else(|| config.default_currency.clone());

        // Create services
        let status_service = StatusService::new(Arc::clone(&repository));
        let movement_service =
            MovementService::new(Arc::clone(&repository), default_currency.clone());
        let stats_service = StatsService::new(Arc::clone(&repository));
        let budget_service = BudgetService::new(Arc::clone(&repository));
        let savings_service = SavingsService::new(
            Arc::clone(&repository),
            MovementService::new(Arc::clone(&repository), default_currency.clone()),
        );
        let shopping_service =
            ShoppingService::new(Arc::clone(&repository), default_currency.clone());
        let analysis_service = AnalysisService::new(
            Arc::clone(&repository),
            default_currency.clone(),
            config.analysis.clone(),
        );
        let export_service = ExportService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            status_service,
            movement_service,
            stats_service,
            budget_service,
            savings_service,
            shopping_service,
            analysis_service,
            export_service,
        })
    }
}
