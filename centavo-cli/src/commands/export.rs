//! Export command - export movements to CSV

use std::path::Path;

use anyhow::Result;

use centavo_core::adapters::duckdb::MovementFilter;

use super::{get_context, get_logger, log_event, parse_date_arg};
use crate::output;

pub fn run(output_path: &Path, from: Option<String>, to: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let filter = MovementFilter {
        from: parse_date_arg(from, "--from")?,
        to: parse_date_arg(to, "--to")?,
        ..Default::default()
    };

    let result = ctx.export_service.export_movements(output_path, &filter)?;
    log_event(
        &logger,
        centavo_core::LogEvent::new("export_completed").with_command("export"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::success(&format!(
            "Exported {} movements to {}",
            result.rows,
            result.path.display()
        ));
    }

    Ok(())
}
