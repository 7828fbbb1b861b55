//! Scan command - scan a receipt image into the ledger

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use centavo_core::{LogEvent, RepositoryResult};

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(image: &Path, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let spinner = if json {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner());
        spinner.set_message("Analyzing receipt...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    let result = ctx.analysis_service.scan_receipt(image);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(scan) => {
            log_event(
                &logger,
                LogEvent::new("scan_completed")
                    .with_provider(&scan.provider)
                    .with_command("scan"),
            );

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&RepositoryResult::ok(&scan))?
                );
                return Ok(());
            }

            for warning in &scan.warnings {
                output::warning(warning);
            }

            if scan.duplicate {
                output::warning("This receipt was already scanned; nothing was added.");
                if let Some(merchant) = &scan.merchant {
                    println!("  Merchant: {}", merchant);
                }
                println!("  Total: {}", output::format_amount(scan.total, &scan.currency));
                return Ok(());
            }

            output::success("Receipt recorded");
            if let Some(merchant) = &scan.merchant {
                println!("  Merchant: {}", merchant);
            }
            println!("  Total: {}", output::format_amount(scan.total, &scan.currency));
            println!("  Items: {}", scan.item_count);
            if let Some(movement_id) = &scan.movement_id {
                println!("  Movement: {}", movement_id);
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("scan_failed")
                    .with_command("scan")
                    .with_error(e.to_string()),
            );

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&RepositoryResult::<()>::fail(e.to_string()))?
                );
                std::process::exit(1);
            }

            eprintln!("{} {}", "Scan failed:".red(), e);
            std::process::exit(1);
        }
    }
}
