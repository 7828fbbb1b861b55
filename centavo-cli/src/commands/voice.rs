//! Voice command - record a voice note as a movement

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use centavo_core::{LogEvent, RepositoryResult};

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(audio: &Path, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let spinner = if json {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner());
        spinner.set_message("Transcribing voice note...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    let result = ctx.analysis_service.record_voice(audio);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(voice) => {
            log_event(
                &logger,
                LogEvent::new("voice_completed")
                    .with_provider(&voice.provider)
                    .with_command("voice"),
            );

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&RepositoryResult::ok(&voice))?
                );
                return Ok(());
            }

            for warning in &voice.warnings {
                output::warning(warning);
            }

            output::success(&format!("{} recorded from voice note", voice.kind.as_str()));
            println!("  Amount: {}", output::format_amount(voice.amount, &voice.currency));
            if let Some(category) = &voice.category {
                println!("  Category: {}", category);
            }
            if let Some(description) = &voice.description {
                println!("  Description: {}", description);
            }
            println!("  Movement: {}", voice.movement_id);
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("voice_failed")
                    .with_command("voice")
                    .with_error(e.to_string()),
            );

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&RepositoryResult::<()>::fail(e.to_string()))?
                );
                std::process::exit(1);
            }

            eprintln!("{} {}", "Voice note failed:".red(), e);
            std::process::exit(1);
        }
    }
}
