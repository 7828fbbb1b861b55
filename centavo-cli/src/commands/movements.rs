//! Movements command - list movements with filters

use anyhow::Result;
use colored::Colorize;

use centavo_core::adapters::duckdb::MovementFilter;
use centavo_core::MovementKind;

use super::{get_context, parse_date_arg};
use crate::output;

pub fn run(
    kind: Option<String>,
    category: Option<String>,
    from: Option<String>,
    to: Option<String>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let kind = match kind {
        Some(k) => Some(
            MovementKind::parse(&k)
                .ok_or_else(|| anyhow::anyhow!("Invalid kind '{}'. Use income, expense, or saving", k))?,
        ),
        None => None,
    };

    let category_id = match category {
        Some(name) => {
            let category = ctx
                .repository
                .get_category_by_name(&name)?
                .ok_or_else(|| anyhow::anyhow!("Category not found: {}", name))?;
            Some(category.id)
        }
        None => None,
    };

    let filter = MovementFilter {
        kind,
        category_id,
        from: parse_date_arg(from, "--from")?,
        to: parse_date_arg(to, "--to")?,
        limit: Some(limit),
    };

    let records = ctx.movement_service.list(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No movements found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Kind", "Amount", "Category", "Description", "ID"]);

    for record in &records {
        let amount = output::format_amount(record.amount, &record.currency);
        let amount = match record.kind {
            MovementKind::Income => format!("+{}", amount),
            MovementKind::Expense => format!("-{}", amount),
            MovementKind::Saving => format!("~{}", amount),
        };

        table.add_row(vec![
            record.date.clone(),
            record.kind.as_str().to_string(),
            amount,
            record.category.clone().unwrap_or_default(),
            record.description.clone().unwrap_or_default(),
            record.id.clone(),
        ]);
    }

    println!("{}", table);
    println!("{}", format!("{} movements", records.len()).dimmed());

    Ok(())
}
