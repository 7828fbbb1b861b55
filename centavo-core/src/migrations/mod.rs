//! Database migrations - embedded SQL files
//!
//! Migrations are compiled into the binary at build time using include_str!.
//! Each migration is a tuple of (name, sql_content).
//! Migrations are sorted by name and applied in order.

/// All migrations, embedded at compile time.
/// Format: (filename, sql_content)
///
/// IMPORTANT: When adding a new migration:
/// 1. Create the SQL file: NNN_description.sql
/// 2. Add an entry here in order
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
    ("002_receipts.sql", include_str!("002_receipts.sql")),
    ("003_budgets.sql", include_str!("003_budgets.sql")),
    ("004_savings_goals.sql", include_str!("004_savings_goals.sql")),
    ("005_shopping_lists.sql", include_str!("005_shopping_lists.sql")),
];
