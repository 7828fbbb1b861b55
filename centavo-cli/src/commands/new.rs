//! New command - create new records

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Input;
use rust_decimal::Decimal;

use centavo_core::services::NewMovement;
use centavo_core::{CategoryKind, MovementKind, Source};

use super::{get_context, parse_date_arg};
use crate::output;

#[derive(Subcommand)]
pub enum NewCommands {
    /// Record an income
    Income {
        /// Amount
        amount: Option<String>,
        /// Description
        #[arg(long, short)]
        description: Option<String>,
        /// Category name
        #[arg(long, short)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// ISO 4217 currency code, defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record an expense
    Expense {
        /// Amount
        amount: Option<String>,
        /// Description
        #[arg(long, short)]
        description: Option<String>,
        /// Category name
        #[arg(long, short)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// ISO 4217 currency code, defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
        /// Mark as a single-item purchase rather than a plain entry
        #[arg(long)]
        item: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a saving
    Saving {
        /// Amount
        amount: Option<String>,
        /// Description
        #[arg(long, short)]
        description: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a category
    Category {
        /// Category name
        name: String,
        /// Kind: income or expense
        #[arg(long, default_value = "expense")]
        kind: String,
    },
    /// Create a savings goal
    Goal {
        /// Goal name
        name: String,
        /// Target amount
        #[arg(long, short)]
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Create a shopping list
    List {
        /// List name
        name: String,
    },
}

pub fn run(command: NewCommands) -> Result<()> {
    match command {
        NewCommands::Income {
            amount,
            description,
            category,
            date,
            currency,
            json,
        } => run_movement(
            MovementKind::Income,
            amount,
            description,
            category,
            date,
            currency,
            None,
            json,
        ),
        NewCommands::Expense {
            amount,
            description,
            category,
            date,
            currency,
            item,
            json,
        } => run_movement(
            MovementKind::Expense,
            amount,
            description,
            category,
            date,
            currency,
            item.then_some(Source::Item),
            json,
        ),
        NewCommands::Saving {
            amount,
            description,
            date,
            json,
        } => run_movement(MovementKind::Saving, amount, description, None, date, None, None, json),
        NewCommands::Category { name, kind } => run_category(&name, &kind),
        NewCommands::Goal {
            name,
            target,
            deadline,
        } => run_goal(&name, &target, deadline),
        NewCommands::List { name } => run_list(&name),
    }
}

fn run_movement(
    kind: MovementKind,
    amount: Option<String>,
    description: Option<String>,
    category: Option<String>,
    date: Option<String>,
    currency: Option<String>,
    source: Option<Source>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    // Get amount interactively if not provided
    let amount_str = match amount {
        Some(a) => a,
        None => Input::new().with_prompt("Amount").interact_text()?,
    };

    let amount_decimal: Decimal = amount_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", amount_str))?;

    let mut input = NewMovement::new(kind, amount_decimal);
    input.description = description;
    input.category = category;
    input.date = parse_date_arg(date, "--date")?;
    input.currency = currency;
    input.source = source;

    let record = ctx.movement_service.add(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        output::success(&format!("{} recorded", capitalize(kind.as_str())));
        println!("  ID: {}", record.id);
        println!("  Amount: {}", output::format_amount(record.amount, &record.currency));
        if let Some(category) = &record.category {
            println!("  Category: {}", category);
        }
        println!("  Date: {}", record.date);
    }

    Ok(())
}

fn run_category(name: &str, kind: &str) -> Result<()> {
    let ctx = get_context()?;

    let kind = CategoryKind::parse(kind)
        .ok_or_else(|| anyhow::anyhow!("Invalid kind '{}'. Use income or expense", kind))?;

    let category = ctx.movement_service.add_category(name, kind)?;
    println!(
        "{} Category '{}' created ({})",
        "Success!".green(),
        category.name,
        category.kind.as_str()
    );

    Ok(())
}

fn run_goal(name: &str, target: &str, deadline: Option<String>) -> Result<()> {
    let ctx = get_context()?;

    let target_decimal: Decimal = target
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid target amount: {}", target))?;
    let deadline = parse_date_arg(deadline, "--deadline")?;

    let goal = ctx
        .savings_service
        .create_goal(name, target_decimal, deadline)?;
    println!(
        "{} Goal '{}' created (target {:.2})",
        "Success!".green(),
        goal.name,
        goal.target_amount
    );
    println!("Use 'cent goal contribute {}' to add savings.", goal.name);

    Ok(())
}

fn run_list(name: &str) -> Result<()> {
    let ctx = get_context()?;
    let list = ctx.shopping_service.create_list(name)?;
    println!("{} List '{}' created", "Success!".green(), list.name);
    println!("Use 'cent shopping add' to put items on it.");
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
