//! Analysis service - receipt scanning and voice notes
//!
//! Orchestrates the document analysis flow: pick the configured provider,
//! send it the media file, reconcile the loosely-typed payload into a
//! Receipt and its expense movement, and dedup repeat scans by fingerprint.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::demo::DemoAnalysisProvider;
use crate::adapters::duckdb::DuckDbRepository;
use crate::adapters::http_analysis::CloudAnalysisProvider;
use crate::config::AnalysisSettings;
use crate::domain::{Movement, MovementKind, Receipt, ReceiptItem, Source, TotalSource};
use crate::ports::{DocumentAnalysisProvider, IntegrationProvider};

/// Analysis service
pub struct AnalysisService {
    repository: Arc<DuckDbRepository>,
    default_currency: String,
    /// settings.json analysis section; fallback when no integration row exists
    config_settings: AnalysisSettings,
    providers: HashMap<String, Arc<dyn DocumentAnalysisProvider>>,
    integration_providers: HashMap<String, Arc<dyn IntegrationProvider>>,
}

impl AnalysisService {
    pub fn new(
        repository: Arc<DuckDbRepository>,
        default_currency: String,
        config_settings: AnalysisSettings,
    ) -> Self {
        let mut providers: HashMap<String, Arc<dyn DocumentAnalysisProvider>> = HashMap::new();
        let mut integration_providers: HashMap<String, Arc<dyn IntegrationProvider>> =
            HashMap::new();

        // Register built-in providers
        let demo = Arc::new(DemoAnalysisProvider::new());
        providers.insert("demo".to_string(), demo.clone());
        integration_providers.insert("demo".to_string(), demo);

        let cloud = Arc::new(CloudAnalysisProvider::new());
        providers.insert("cloud".to_string(), cloud.clone());
        integration_providers.insert("cloud".to_string(), cloud);

        Self {
            repository,
            default_currency,
            config_settings,
            providers,
            integration_providers,
        }
    }

    /// Scan a receipt image into the ledger
    ///
    /// Re-scanning the same receipt (same merchant, date, and total) is
    /// detected by fingerprint and reported as a duplicate instead of
    /// creating a second expense.
    pub fn scan_receipt(&self, image_path: &Path) -> Result<ScanResult> {
        let (provider, settings) = self.configured_provider()?;

        if !provider.can_analyze_receipts() {
            anyhow::bail!("Provider '{}' cannot analyze receipt images", provider.name());
        }

        let analysis = provider.analyze_receipt(image_path, &settings)?;
        let payload = analysis.payload;
        let mut warnings = analysis.warnings;

        let resolved = payload.resolve_total();
        match resolved.source {
            TotalSource::Missing => {
                warnings.push("No total found in the extraction; recorded as zero".to_string())
            }
            TotalSource::ItemSum => {
                warnings.push("No explicit total in the extraction; summed line items".to_string())
            }
            _ => {}
        }

        let purchased_date = payload.resolve_date().unwrap_or_else(|| {
            warnings.push("No purchase date in the extraction; using today".to_string());
            Utc::now().date_naive()
        });

        let currency = payload
            .currency
            .clone()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.default_currency.clone());

        let mut receipt = Receipt::new(Uuid::new_v4(), resolved.amount, currency, purchased_date);
        receipt.merchant = payload
            .merchant
            .clone()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        receipt.items = payload
            .reconcile_items()
            .into_iter()
            .map(|item| {
                let mut receipt_item = ReceiptItem::new(receipt.id, item.name);
                receipt_item.quantity = item.quantity;
                receipt_item.unit_price = item.unit_price;
                receipt_item.line_total = item.line_total;
                receipt_item
            })
            .collect();
        receipt.extraction = serde_json::to_value(&payload).ok();
        receipt.ensure_fingerprint();

        // Fingerprint dedup: a second scan of the same receipt is a no-op
        if let Some(fingerprint) = &receipt.fingerprint {
            if self.repository.receipt_exists_by_fingerprint(fingerprint)? {
                return Ok(ScanResult {
                    provider: provider.name().to_string(),
                    receipt_id: None,
                    movement_id: None,
                    merchant: receipt.merchant,
                    total: receipt.total,
                    currency: receipt.currency,
                    item_count: receipt.items.len(),
                    duplicate: true,
                    warnings,
                });
            }
        }

        let mut movement = Movement::new(
            Uuid::new_v4(),
            MovementKind::Expense,
            receipt.total,
            purchased_date,
        );
        movement.currency = receipt.currency.clone();
        movement.description = receipt.merchant.clone();
        movement.source = Some(Source::Receipt);
        movement.receipt_id = Some(receipt.id);
        movement.category_id = self.guess_expense_category();

        self.repository.insert_receipt(&receipt)?;
        self.repository.upsert_movement(&movement)?;

        Ok(ScanResult {
            provider: provider.name().to_string(),
            receipt_id: Some(receipt.id.to_string()),
            movement_id: Some(movement.id.to_string()),
            merchant: receipt.merchant,
            total: receipt.total,
            currency: receipt.currency,
            item_count: receipt.items.len(),
            duplicate: false,
            warnings,
        })
    }

    /// Record a voice note as a movement
    ///
    /// Voice notes produce a movement without receipt items; the kind hint
    /// defaults to expense when the transcription is unsure.
    pub fn record_voice(&self, audio_path: &Path) -> Result<VoiceResult> {
        let (provider, settings) = self.configured_provider()?;

        if !provider.can_analyze_voice() {
            anyhow::bail!("Provider '{}' cannot analyze voice notes", provider.name());
        }

        let analysis = provider.analyze_voice(audio_path, &settings)?;
        let payload = analysis.payload;
        let mut warnings = analysis.warnings;

        let amount = match payload.amount {
            Some(amount) if amount > rust_decimal::Decimal::ZERO => amount,
            _ => {
                anyhow::bail!(
                    "No amount could be extracted from the voice note{}",
                    if warnings.is_empty() { "" } else { " (response was unparseable)" }
                );
            }
        };

        let kind = payload.resolve_kind();
        let date = payload.resolve_date().unwrap_or_else(|| Utc::now().date_naive());

        // Category is matched by name when the hint resolves; a miss is a
        // warning, not an error
        let category_id = match &payload.category {
            Some(name) => match self.repository.get_category_by_name(name)? {
                Some(category) => Some(category.id),
                None => {
                    warnings.push(format!("Unknown category '{}' ignored", name));
                    None
                }
            },
            None => None,
        };

        let mut movement = Movement::new(Uuid::new_v4(), kind, amount, date);
        movement.currency = self.default_currency.clone();
        movement.description = payload
            .description
            .clone()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        movement.category_id = category_id;
        if kind == MovementKind::Expense {
            movement.source = Some(Source::Voice);
        }

        self.repository.upsert_movement(&movement)?;

        Ok(VoiceResult {
            provider: provider.name().to_string(),
            movement_id: movement.id.to_string(),
            kind,
            amount,
            currency: movement.currency.clone(),
            category: payload.category.filter(|_| category_id.is_some()),
            description: movement.description.clone(),
            warnings,
        })
    }

    /// List configured analysis integrations
    pub fn list_integrations(&self) -> Result<Vec<String>> {
        let integrations = self.repository.get_integrations()?;
        Ok(integrations.iter().map(|i| i.name.clone()).collect())
    }

    /// Set up an analysis integration using the matching provider
    pub fn setup_integration(&self, provider_name: &str, options: &serde_json::Value) -> Result<()> {
        let provider = self
            .integration_providers
            .get(provider_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown provider: {}", provider_name))?;

        let settings = provider.setup(options)?;
        self.repository.upsert_integration(provider_name, &settings)?;
        Ok(())
    }

    /// Remove an analysis integration
    pub fn remove_integration(&self, name: &str) -> Result<()> {
        if !self.repository.delete_integration(name)? {
            anyhow::bail!("Integration not found: {}", name);
        }
        Ok(())
    }

    /// Set up the demo integration (convenience method)
    pub fn setup_demo(&self) -> Result<()> {
        self.setup_integration("demo", &serde_json::json!({}))
    }

    /// Set up the cloud integration (convenience method)
    ///
    /// # Arguments
    /// * `api_key` - The API key from the user's dashboard
    /// * `base_url` - Optional custom base URL for testing (None = production)
    pub fn setup_cloud(&self, api_key: &str, base_url: Option<&str>) -> Result<()> {
        let mut options = serde_json::json!({
            "apiKey": api_key
        });
        if let Some(url) = base_url {
            options["baseUrl"] = serde_json::json!(url);
        }
        self.setup_integration("cloud", &options)
    }

    /// Find the configured integration with a registered provider
    ///
    /// An apiKey in settings.json works as a fallback when no integration
    /// row exists (other front ends write the key there).
    fn configured_provider(
        &self,
    ) -> Result<(Arc<dyn DocumentAnalysisProvider>, serde_json::Value)> {
        let integrations = self.repository.get_integrations()?;

        for integration in &integrations {
            if let Some(provider) = self.providers.get(&integration.name) {
                return Ok((provider.clone(), integration.settings.clone()));
            }
        }

        if let Some(api_key) = self
            .config_settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
        {
            let mut settings = serde_json::json!({ "apiKey": api_key });
            if let Some(base_url) = &self.config_settings.base_url {
                settings["baseUrl"] = serde_json::json!(base_url);
            }
            if let Some(provider) = self.providers.get("cloud") {
                return Ok((provider.clone(), settings));
            }
        }

        anyhow::bail!("No analysis integration configured. Run 'cent setup cloud' first.")
    }

    /// Pick a default category for scanned receipts
    ///
    /// Receipts are almost always grocery runs in practice; fall back to
    /// uncategorized when the builtin set was edited away.
    fn guess_expense_category(&self) -> Option<Uuid> {
        self.repository
            .get_category_by_name("Groceries")
            .ok()
            .flatten()
            .map(|c| c.id)
    }
}

/// Result of scanning a receipt
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub provider: String,
    /// None when the scan was a duplicate
    pub receipt_id: Option<String>,
    pub movement_id: Option<String>,
    pub merchant: Option<String>,
    pub total: rust_decimal::Decimal,
    pub currency: String,
    pub item_count: usize,
    pub duplicate: bool,
    pub warnings: Vec<String>,
}

/// Result of recording a voice note
#[derive(Debug, Clone, Serialize)]
pub struct VoiceResult {
    pub provider: String,
    pub movement_id: String,
    pub kind: MovementKind,
    pub amount: rust_decimal::Decimal,
    pub currency: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub warnings: Vec<String>,
}
