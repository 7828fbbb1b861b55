//! Configuration management
//!
//! Reads and writes settings.json in the centavo directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "defaultCurrency": "USD", ... },
//!   "analysis": { "baseUrl": "...", "apiKey": "..." }
//! }
//! ```
//! Unknown fields are preserved on save so other front ends can store
//! their own settings in the same file.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_CURRENCY;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    analysis: AnalysisSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    default_currency: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Analysis endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Centavo configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub default_currency: String,
    pub analysis: AnalysisSettings,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            default_currency: DEFAULT_CURRENCY.to_string(),
            analysis: AnalysisSettings::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the centavo directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (cent demo on)
    /// 2. Environment variable CENTAVO_DEMO_MODE (for CI/testing)
    pub fn load(centavo_dir: &Path) -> Result<Self> {
        let settings_path = centavo_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Check env var for demo mode override (for CI/testing)
        let demo_mode = match std::env::var("CENTAVO_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        let default_currency = raw
            .app
            .default_currency
            .clone()
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.trim().to_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(Self {
            demo_mode,
            default_currency,
            analysis: raw.analysis.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the centavo directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, centavo_dir: &Path) -> Result<()> {
        let settings_path = centavo_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Update only the fields we manage
        settings.app.demo_mode = self.demo_mode;
        settings.app.default_currency = Some(self.default_currency.clone());
        settings.analysis = self.analysis.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}
