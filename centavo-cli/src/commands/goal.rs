//! Goal command - manage savings goals

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use rust_decimal::Decimal;

use super::{get_context, parse_date_arg};
use crate::output;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// List goals with progress
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show progress for one goal
    Progress {
        /// Goal name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Contribute to a goal (creates a saving movement)
    Contribute {
        /// Goal name
        name: String,
        /// Amount to contribute
        amount: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a goal (its saving movements stay in the ledger)
    Remove {
        /// Goal name
        name: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: GoalCommands) -> Result<()> {
    match command {
        GoalCommands::List { json } => {
            let ctx = get_context()?;
            let goals = ctx.savings_service.list_goals()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&goals)?);
                return Ok(());
            }

            if goals.is_empty() {
                println!("No goals yet. Use 'cent new goal' to create one.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Goal", "Target", "Saved", "Remaining", "Progress", "Deadline"]);

            for goal in &goals {
                let progress = if goal.progress.reached {
                    "reached".green().to_string()
                } else {
                    output::format_percent(goal.progress.ratio)
                };
                table.add_row(vec![
                    goal.name.clone(),
                    format!("{:.2}", goal.target_amount),
                    format!("{:.2}", goal.progress.saved),
                    format!("{:.2}", goal.progress.remaining),
                    progress,
                    goal.deadline.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        GoalCommands::Progress { name, json } => {
            let ctx = get_context()?;
            let goal = ctx.savings_service.goal_progress(&name)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&goal)?);
                return Ok(());
            }

            println!("{}", goal.name.bold());
            println!(
                "  {:.2} of {:.2} saved ({})",
                goal.progress.saved,
                goal.target_amount,
                output::format_percent(goal.progress.ratio)
            );
            if goal.progress.reached {
                output::success("  Goal reached!");
            } else {
                println!("  {:.2} to go", goal.progress.remaining);
            }
            if let Some(days) = goal.progress.days_remaining {
                if days >= 0 {
                    println!("  {} days until deadline", days);
                } else {
                    output::warning(&format!("  Deadline passed {} days ago", -days));
                }
            }
            Ok(())
        }
        GoalCommands::Contribute { name, amount, date } => {
            let ctx = get_context()?;
            let amount: Decimal = amount
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid amount: {}", amount))?;
            let date = parse_date_arg(date, "--date")?;

            let goal = ctx.savings_service.contribute(&name, amount, date)?;
            output::success(&format!("Contributed {:.2} to '{}'", amount, goal.name));
            println!(
                "  Now at {:.2} of {:.2} ({})",
                goal.progress.saved,
                goal.target_amount,
                output::format_percent(goal.progress.ratio)
            );
            Ok(())
        }
        GoalCommands::Remove { name, force } => {
            let ctx = get_context()?;

            if !force {
                println!(
                    "\n{}",
                    format!("This will remove the goal '{}'.", name).yellow()
                );
                println!("{}\n", "Its saving movements will remain in the ledger.".dimmed());

                if !Confirm::new()
                    .with_prompt("Are you sure?")
                    .default(false)
                    .interact()?
                {
                    println!("{}\n", "Cancelled".dimmed());
                    return Ok(());
                }
            }

            ctx.savings_service.remove_goal(&name)?;
            output::success(&format!("Goal '{}' removed", name));
            Ok(())
        }
    }
}
