//! Remove command - soft delete movements

use std::io::{self, Read};

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_context;

pub fn run(ids: Vec<String>, force: bool) -> Result<()> {
    let ctx = get_context()?;

    // Get IDs from arguments or stdin
    let id_list: Vec<String> = if ids.is_empty() && atty::isnt(atty::Stream::Stdin) {
        // Read from stdin: one ID per line, or comma-separated on one line
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        let trimmed = buffer.trim();

        if trimmed.contains('\n') {
            trimmed
                .lines()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        } else {
            trimmed
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }
    } else {
        ids
    };

    if id_list.is_empty() {
        anyhow::bail!("No movement IDs provided. Pass them as arguments or pipe from stdin.");
    }

    if !force {
        println!(
            "\n{}",
            format!("This will remove {} movement(s) from the ledger.", id_list.len()).yellow()
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

    let mut removed = 0;
    for id in &id_list {
        match ctx.movement_service.remove(id) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("{} {}", "Skipped:".yellow(), e),
        }
    }

    println!("{} {} movement(s) removed", "Done.".green(), removed);
    Ok(())
}
