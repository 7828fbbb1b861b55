//! Status command - show ledger status and summary

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    super::log_event(&logger, centavo_core::LogEvent::new("command_executed").with_command("status"));

    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Centavo Status".bold());
    if ctx.config.demo_mode {
        println!("{}", "(demo mode)".yellow());
    }
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Movements", &status.total_movements.to_string()]);
    table.add_row(vec!["  Incomes", &status.total_incomes.to_string()]);
    table.add_row(vec!["  Expenses", &status.total_expenses.to_string()]);
    table.add_row(vec!["  Savings", &status.total_savings.to_string()]);
    table.add_row(vec!["Receipts", &status.total_receipts.to_string()]);
    table.add_row(vec!["Budgets", &status.total_budgets.to_string()]);
    table.add_row(vec!["Goals", &status.total_goals.to_string()]);
    table.add_row(vec!["Shopping lists", &status.total_shopping_lists.to_string()]);

    println!("{}", table);
    println!();

    if let (Some(earliest), Some(latest)) = (&status.date_range.earliest, &status.date_range.latest)
    {
        println!("Date range: {} to {}", earliest, latest);
        println!();
    }

    if let Some(name) = &status.profile_name {
        println!(
            "Profile: {} ({})",
            name,
            status.default_currency.as_deref().unwrap_or("USD")
        );
    }

    if !status.integration_names.is_empty() {
        println!("{}", "Analysis integrations".bold());
        for name in &status.integration_names {
            println!("  - {}", name);
        }
    } else {
        println!("{}", "No analysis integration configured. Run 'cent setup cloud'.".dimmed());
    }

    Ok(())
}
