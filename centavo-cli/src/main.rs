//! Centavo CLI - Personal finance in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{
    budget, demo, export, goal, logs, movements, new, remove, scan, setup, shopping, stats, status,
    voice,
};

/// Centavo - personal finance in your terminal
#[derive(Parser)]
#[command(name = "cent", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ledger status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create new records
    New {
        #[command(subcommand)]
        command: new::NewCommands,
    },

    /// List movements
    Movements {
        /// Filter by kind (income, expense, saving)
        #[arg(long)]
        kind: Option<String>,
        /// Filter by category name
        #[arg(long)]
        category: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Maximum number of rows
        #[arg(long, default_value = "50")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregated statistics
    Stats {
        /// Start date (YYYY-MM-DD), defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
        /// Bucket size: day, week, or month
        #[arg(long, default_value = "month")]
        by: String,
        /// Show expense breakdown by category instead
        #[arg(long)]
        categories: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage category budgets
    Budget {
        #[command(subcommand)]
        command: budget::BudgetCommands,
    },

    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        command: goal::GoalCommands,
    },

    /// Manage shopping lists
    Shopping {
        #[command(subcommand)]
        command: shopping::ShoppingCommands,
    },

    /// Scan a receipt image into the ledger
    Scan {
        /// Path to the receipt image
        image: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a voice note as a movement
    Voice {
        /// Path to the audio file
        audio: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export movements to CSV
    Export {
        /// Output file path
        #[arg(short, long, default_value = "movements.csv")]
        output: PathBuf,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a movement
    Remove {
        /// Movement IDs to remove (or pipe them from stdin)
        #[arg(value_delimiter = ',')]
        ids: Vec<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Set up the analysis integration or the user profile
    Setup {
        #[command(subcommand)]
        command: setup::SetupCommands,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::New { command } => new::run(command),
        Commands::Movements {
            kind,
            category,
            from,
            to,
            limit,
            json,
        } => movements::run(kind, category, from, to, limit, json),
        Commands::Stats {
            from,
            to,
            by,
            categories,
            json,
        } => stats::run(from, to, &by, categories, json),
        Commands::Budget { command } => budget::run(command),
        Commands::Goal { command } => goal::run(command),
        Commands::Shopping { command } => shopping::run(command),
        Commands::Scan { image, json } => scan::run(&image, json),
        Commands::Voice { audio, json } => voice::run(&audio, json),
        Commands::Export {
            output,
            from,
            to,
            json,
        } => export::run(&output, from, to, json),
        Commands::Remove { ids, force } => remove::run(ids, force),
        Commands::Setup { command } => setup::run(command),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
