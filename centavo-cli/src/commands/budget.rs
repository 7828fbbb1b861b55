//! Budget command - manage category budgets

use anyhow::Result;
use chrono::Datelike;
use clap::Subcommand;
use colored::Colorize;
use rust_decimal::Decimal;

use centavo_core::domain::budget::parse_month;
use centavo_core::BudgetStatus;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set or update a budget for a category and month
    Set {
        /// Category name
        category: String,
        /// Budget amount
        amount: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
    /// Show budget progress for a month
    Status {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a budget
    Remove {
        /// Category name
        category: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
}

fn month_arg(month: Option<String>) -> Result<chrono::NaiveDate> {
    match month {
        Some(s) => {
            parse_month(&s).ok_or_else(|| anyhow::anyhow!("Invalid month '{}'. Use YYYY-MM", s))
        }
        None => Ok(chrono::Utc::now()
            .date_naive()
            .with_day(1)
            .expect("first of month")),
    }
}

pub fn run(command: BudgetCommands) -> Result<()> {
    match command {
        BudgetCommands::Set {
            category,
            amount,
            month,
        } => {
            let ctx = get_context()?;
            let amount: Decimal = amount
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid amount: {}", amount))?;
            let month = month_arg(month)?;

            let progress = ctx.budget_service.set_budget(&category, month, amount)?;
            output::success(&format!(
                "Budget set: {} {:.2} for {}",
                progress.category, progress.amount, progress.month
            ));
            println!(
                "  Spent so far: {:.2} ({})",
                progress.spent,
                output::format_percent(progress.ratio)
            );
            Ok(())
        }
        BudgetCommands::Status { month, json } => {
            let ctx = get_context()?;
            let month = month_arg(month)?;
            let report = ctx.budget_service.month_status(month)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if report.is_empty() {
                println!(
                    "No budgets for {}. Use 'cent budget set' to add one.",
                    month.format("%Y-%m")
                );
                return Ok(());
            }

            println!("{}", format!("Budgets for {}", month.format("%Y-%m")).bold());
            println!();

            let mut table = output::create_table();
            table.set_header(vec!["Category", "Budget", "Spent", "Remaining", "Used", "Status"]);

            for progress in &report {
                let status = match progress.status {
                    BudgetStatus::OnTrack => "on track".green().to_string(),
                    BudgetStatus::Warning => "warning".yellow().to_string(),
                    BudgetStatus::Exceeded => "exceeded".red().to_string(),
                };
                table.add_row(vec![
                    progress.category.clone(),
                    format!("{:.2}", progress.amount),
                    format!("{:.2}", progress.spent),
                    format!("{:.2}", progress.remaining),
                    output::format_percent(progress.ratio),
                    status,
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        BudgetCommands::Remove { category, month } => {
            let ctx = get_context()?;
            let month = month_arg(month)?;
            if ctx.budget_service.remove_budget(&category, month)? {
                output::success(&format!(
                    "Budget removed: {} for {}",
                    category,
                    month.format("%Y-%m")
                ));
            } else {
                output::warning(&format!(
                    "No budget for {} in {}",
                    category,
                    month.format("%Y-%m")
                ));
            }
            Ok(())
        }
    }
}
