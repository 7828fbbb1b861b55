//! Stats command - aggregated statistics

use anyhow::Result;
use chrono::{Duration, Utc};
use colored::Colorize;

use centavo_core::services::Bucket;

use super::{get_context, parse_date_arg};
use crate::output;

pub fn run(
    from: Option<String>,
    to: Option<String>,
    by: &str,
    categories: bool,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let to = parse_date_arg(to, "--to")?.unwrap_or_else(|| Utc::now().date_naive());
    let from = parse_date_arg(from, "--from")?.unwrap_or(to - Duration::days(30));

    if categories {
        let shares = ctx.stats_service.category_breakdown(from, to)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&shares)?);
            return Ok(());
        }

        if shares.is_empty() {
            println!("No expenses between {} and {}.", from, to);
            return Ok(());
        }

        println!("{}", format!("Expenses by category, {} to {}", from, to).bold());
        println!();

        let mut table = output::create_table();
        table.set_header(vec!["Category", "Total", "Share"]);
        for share in &shares {
            table.add_row(vec![
                share.category.clone(),
                format!("{:.2}", share.total),
                output::format_percent(share.share),
            ]);
        }
        println!("{}", table);
        return Ok(());
    }

    let bucket = Bucket::parse(by)
        .ok_or_else(|| anyhow::anyhow!("Invalid bucket '{}'. Use day, week, or month", by))?;
    let summaries = ctx.stats_service.overview(from, to, bucket)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No movements between {} and {}.", from, to);
        return Ok(());
    }

    println!("{}", format!("Statistics, {} to {}", from, to).bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Bucket", "Income", "Expense", "Saving", "Net"]);
    for summary in &summaries {
        let net = format!("{:.2}", summary.net);
        let net = if summary.net.is_sign_negative() {
            net.red().to_string()
        } else {
            net.green().to_string()
        };
        table.add_row(vec![
            summary.bucket_start.clone(),
            format!("{:.2}", summary.income),
            format!("{:.2}", summary.expense),
            format!("{:.2}", summary.saving),
            net,
        ]);
    }
    println!("{}", table);

    Ok(())
}
