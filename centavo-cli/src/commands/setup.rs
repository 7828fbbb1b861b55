//! Setup command - analysis integration and user profile

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Input;

use centavo_core::{Movement, User};

use super::{get_centavo_dir, get_context};

#[derive(Subcommand)]
pub enum SetupCommands {
    /// Set up the cloud analysis integration
    Cloud {
        /// API key from your dashboard
        #[arg(long)]
        api_key: Option<String>,
        /// Custom endpoint base URL (for testing)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Set your name and default currency
    Profile {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// ISO 4217 currency code
        #[arg(long)]
        currency: Option<String>,
    },
}

pub fn run(command: SetupCommands) -> Result<()> {
    match command {
        SetupCommands::Cloud { api_key, base_url } => {
            let centavo_dir = get_centavo_dir();
            let config = centavo_core::config::Config::load(&centavo_dir).unwrap_or_default();

            // Block cloud setup in demo mode; demo has its own provider
            if config.demo_mode {
                println!("Cloud setup is blocked in demo mode. Use 'cent demo off' first.");
                std::process::exit(1);
            }

            let ctx = get_context()?;

            let key = match api_key {
                Some(k) => k,
                None => Input::new().with_prompt("Analysis API key").interact_text()?,
            };

            ctx.analysis_service.setup_cloud(&key, base_url.as_deref())?;
            println!("{} Cloud analysis integration set up", "Success!".green());
            println!("Run 'cent scan <image>' to scan your first receipt.");
            Ok(())
        }
        SetupCommands::Profile { name, currency } => {
            let ctx = get_context()?;

            let mut user = ctx.repository.get_user()?.unwrap_or_default();
            if let Some(name) = name {
                user.name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
            }
            if let Some(currency) = currency {
                let normalized = Movement::normalize_currency(&currency);
                if normalized.is_empty() {
                    anyhow::bail!("Currency cannot be empty");
                }
                user.default_currency = normalized;
            }
            ctx.repository.upsert_user(&user)?;

            println!("{} Profile updated", "Success!".green());
            if let Some(name) = &user.name {
                println!("  Name: {}", name);
            }
            println!("  Default currency: {}", user.default_currency);
            Ok(())
        }
    }
}
