//! Shopping command - manage shopping lists

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use rust_decimal::Decimal;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum ShoppingCommands {
    /// List all shopping lists
    Lists {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one list with its items
    Show {
        /// List name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an item to a list
    Add {
        /// List name
        list: String,
        /// Item name
        item: String,
        /// Quantity
        #[arg(long, short, default_value = "1")]
        quantity: String,
        /// Price estimate per unit
        #[arg(long, short)]
        price: Option<String>,
    },
    /// Check off an item (or uncheck with --undo)
    Check {
        /// List name
        list: String,
        /// Item name
        item: String,
        /// Uncheck instead
        #[arg(long)]
        undo: bool,
    },
    /// Turn checked items into a receipt-backed expense
    Complete {
        /// List name
        list: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an item, or a whole list when no item is given
    Remove {
        /// List name
        list: String,
        /// Item name (omit to remove the whole list)
        item: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: ShoppingCommands) -> Result<()> {
    match command {
        ShoppingCommands::Lists { json } => {
            let ctx = get_context()?;
            let lists = ctx.shopping_service.list_summaries()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&lists)?);
                return Ok(());
            }

            if lists.is_empty() {
                println!("No shopping lists yet. Use 'cent new list' to create one.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["List", "Items", "Checked", "Estimated total"]);
            for list in &lists {
                table.add_row(vec![
                    list.name.clone(),
                    list.item_count.to_string(),
                    list.checked_count.to_string(),
                    format!("{:.2}", list.estimated_total),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        ShoppingCommands::Show { name, json } => {
            let ctx = get_context()?;
            let list = ctx.shopping_service.get_list(&name)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
                return Ok(());
            }

            println!("{}", list.name.bold());
            if list.items.is_empty() {
                println!("  (empty)");
                return Ok(());
            }

            for item in &list.items {
                let mark = if item.checked { "[x]" } else { "[ ]" };
                let price = item
                    .unit_price
                    .map(|p| format!(" @ {:.2}", p))
                    .unwrap_or_default();
                println!("  {} {} x{}{}", mark, item.name, item.quantity, price);
            }
            println!();
            println!("Estimated total: {:.2}", list.estimated_total());
            Ok(())
        }
        ShoppingCommands::Add {
            list,
            item,
            quantity,
            price,
        } => {
            let ctx = get_context()?;
            let quantity: Decimal = quantity
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid quantity: {}", quantity))?;
            let price = match price {
                Some(p) => Some(
                    p.parse::<Decimal>()
                        .map_err(|_| anyhow::anyhow!("Invalid price: {}", p))?,
                ),
                None => None,
            };

            let added = ctx.shopping_service.add_item(&list, &item, quantity, price)?;
            output::success(&format!("Added {} x{} to '{}'", added.name, added.quantity, list));
            Ok(())
        }
        ShoppingCommands::Check { list, item, undo } => {
            let ctx = get_context()?;
            ctx.shopping_service.set_checked(&list, &item, !undo)?;
            if undo {
                println!("Unchecked '{}' on '{}'", item, list);
            } else {
                println!("Checked '{}' on '{}'", item, list);
            }
            Ok(())
        }
        ShoppingCommands::Complete { list, json } => {
            let ctx = get_context()?;
            let trip = ctx.shopping_service.complete(&list)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&trip)?);
                return Ok(());
            }

            output::success(&format!(
                "Trip recorded: {} for {}",
                output::format_amount(trip.total, &trip.currency),
                trip.list
            ));
            println!("  {} items purchased", trip.items_purchased);
            if trip.items_skipped_unpriced > 0 {
                output::warning(&format!(
                    "  {} checked items without a price were left on the list",
                    trip.items_skipped_unpriced
                ));
            }
            println!("  Receipt: {}", trip.receipt_id);
            println!("  Movement: {}", trip.movement_id);
            Ok(())
        }
        ShoppingCommands::Remove { list, item, force } => {
            let ctx = get_context()?;

            match item {
                Some(item) => {
                    ctx.shopping_service.remove_item(&list, &item)?;
                    output::success(&format!("Removed '{}' from '{}'", item, list));
                }
                None => {
                    if !force {
                        println!(
                            "\n{}",
                            format!("This will remove the list '{}' and all its items.", list)
                                .yellow()
                        );
                        if !Confirm::new()
                            .with_prompt("Are you sure?")
                            .default(false)
                            .interact()?
                        {
                            println!("{}\n", "Cancelled".dimmed());
                            return Ok(());
                        }
                    }
                    ctx.shopping_service.remove_list(&list)?;
                    output::success(&format!("List '{}' removed", list));
                }
            }
            Ok(())
        }
    }
}
