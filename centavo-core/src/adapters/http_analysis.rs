//! Cloud analysis API client
//!
//! Handles communication with the hosted analysis endpoints that extract
//! structured data from receipt images and voice notes. Both endpoints take
//! a multipart file upload and return a loosely-typed JSON payload; a body
//! that fails to parse degrades to an empty payload with a warning instead
//! of failing the whole scan.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use serde_json::Value as JsonValue;

use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::{ExtractionPayload, VoicePayload};
use crate::ports::{DocumentAnalysisProvider, IntegrationProvider, ReceiptAnalysis, VoiceAnalysis};

/// Default production API URL
const ANALYSIS_PRODUCTION_URL: &str = "https://api.centavo.app/v1";

/// Environment variable to override the analysis API base URL.
/// Set this to use a staging/sandbox environment for testing.
pub const ANALYSIS_BASE_URL_ENV: &str = "CENTAVO_ANALYSIS_URL";

/// Get the analysis base URL, checking environment variable first
pub fn get_base_url() -> String {
    std::env::var(ANALYSIS_BASE_URL_ENV).unwrap_or_else(|_| ANALYSIS_PRODUCTION_URL.to_string())
}

/// Cloud analysis API client
#[derive(Debug)]
pub struct AnalysisClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnalysisClient {
    /// Create a new analysis client with the given API key.
    ///
    /// Uses the `CENTAVO_ANALYSIS_URL` environment variable if set,
    /// otherwise defaults to the production API.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::new_with_base_url(api_key, &get_base_url())
    }

    /// Create a new analysis client with a custom base URL.
    ///
    /// Prefer using `new()` with the `CENTAVO_ANALYSIS_URL` env var for testing.
    pub fn new_with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.is_empty() {
            anyhow::bail!("Analysis API key cannot be empty");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload a receipt image for extraction
    pub fn analyze_receipt(&self, image_path: &Path) -> Result<ReceiptAnalysis> {
        let body = self.post_file("receipts/analyze", "image", image_path)?;

        let mut warnings = Vec::new();
        let payload = match ExtractionPayload::parse(&body) {
            Some(payload) => payload,
            None => {
                warnings.push("Analysis response could not be parsed; no data extracted".to_string());
                ExtractionPayload::default()
            }
        };

        Ok(ReceiptAnalysis { payload, warnings })
    }

    /// Upload a voice note for transcription and extraction
    pub fn analyze_voice(&self, audio_path: &Path) -> Result<VoiceAnalysis> {
        let body = self.post_file("voice/analyze", "audio", audio_path)?;

        let mut warnings = Vec::new();
        let payload = match VoicePayload::parse(&body) {
            Some(payload) => payload,
            None => {
                warnings.push("Analysis response could not be parsed; no data extracted".to_string());
                VoicePayload::default()
            }
        };

        Ok(VoiceAnalysis { payload, warnings })
    }

    /// POST a file as multipart form data and return the raw response body
    fn post_file(&self, endpoint: &str, part_name: &str, file_path: &Path) -> Result<String> {
        if !file_path.exists() {
            anyhow::bail!("File not found: {}", file_path.display());
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        let form = multipart::Form::new()
            .file(part_name.to_string(), file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        self.check_response_status(&response)?;

        let body = response.text().context("Failed to read analysis response")?;
        Ok(body)
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> anyhow::Error {
        if error.is_timeout() {
            anyhow::anyhow!("Connection timed out after 120 seconds")
        } else if error.is_connect() {
            anyhow::anyhow!("Unable to connect to the analysis service")
        } else {
            anyhow::anyhow!("Analysis request failed: {}", error)
        }
    }

    /// Check response status and return appropriate errors
    fn check_response_status(&self, response: &reqwest::blocking::Response) -> Result<()> {
        match response.status().as_u16() {
            200 => Ok(()),
            401 => anyhow::bail!(
                "Analysis authentication failed. Your API key may be invalid or revoked."
            ),
            402 => anyhow::bail!(
                "Analysis subscription required. Please check your account at https://centavo.app"
            ),
            413 => anyhow::bail!("File too large for the analysis service."),
            429 => anyhow::bail!(
                "Analysis rate limit exceeded. Please wait a moment and try again."
            ),
            403 => anyhow::bail!("Analysis access denied. Please check your API key permissions."),
            404 => anyhow::bail!("Analysis endpoint not found."),
            status => anyhow::bail!("Analysis API error: HTTP {}", status),
        }
    }
}

// =============================================================================
// CloudAnalysisProvider - implements DocumentAnalysisProvider trait
// =============================================================================

/// Cloud analysis provider
///
/// Implements DocumentAnalysisProvider and IntegrationProvider traits
/// on top of the hosted analysis endpoints.
pub struct CloudAnalysisProvider;

impl CloudAnalysisProvider {
    pub fn new() -> Self {
        Self
    }

    fn client_from_settings(settings: &JsonValue) -> DomainResult<AnalysisClient> {
        let api_key = settings
            .get("apiKey")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::Config("Analysis apiKey not found in settings".to_string()))?;

        // Check for custom base URL (for testing with mock server)
        let base_url = settings.get("baseUrl").and_then(|v| v.as_str());

        let client = if let Some(url) = base_url {
            AnalysisClient::new_with_base_url(api_key, url)
        } else {
            AnalysisClient::new(api_key)
        }
        .map_err(|e| DomainError::Analysis(e.to_string()))?;

        Ok(client)
    }
}

impl Default for CloudAnalysisProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAnalysisProvider for CloudAnalysisProvider {
    fn name(&self) -> &str {
        "cloud"
    }

    fn can_analyze_receipts(&self) -> bool {
        true
    }

    fn can_analyze_voice(&self) -> bool {
        true
    }

    fn analyze_receipt(&self, image_path: &Path, settings: &JsonValue) -> DomainResult<ReceiptAnalysis> {
        let client = Self::client_from_settings(settings)?;
        client
            .analyze_receipt(image_path)
            .map_err(|e| DomainError::Analysis(e.to_string()))
    }

    fn analyze_voice(&self, audio_path: &Path, settings: &JsonValue) -> DomainResult<VoiceAnalysis> {
        let client = Self::client_from_settings(settings)?;
        client
            .analyze_voice(audio_path)
            .map_err(|e| DomainError::Analysis(e.to_string()))
    }
}

impl IntegrationProvider for CloudAnalysisProvider {
    fn setup(&self, options: &JsonValue) -> DomainResult<JsonValue> {
        let api_key = options
            .get("apiKey")
            .and_then(|v| v.as_str())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DomainError::Config("Analysis apiKey required for setup".to_string()))?;

        // Check for custom base URL (for testing with mock server)
        let base_url = options.get("baseUrl").and_then(|v| v.as_str());

        // Validate the client can be constructed with these options
        if let Some(url) = base_url {
            AnalysisClient::new_with_base_url(api_key, url)
        } else {
            AnalysisClient::new(api_key)
        }
        .map_err(|e| DomainError::Analysis(e.to_string()))?;

        // Build settings to store
        let mut settings = serde_json::json!({
            "apiKey": api_key
        });

        // Include base URL if custom (for testing)
        if let Some(url) = base_url {
            settings["baseUrl"] = serde_json::json!(url);
        }

        Ok(settings)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider = CloudAnalysisProvider::new();
        assert_eq!(provider.name(), "cloud");
    }

    #[test]
    fn test_provider_capabilities() {
        let provider = CloudAnalysisProvider::new();
        assert!(provider.can_analyze_receipts());
        assert!(provider.can_analyze_voice());
    }

    #[test]
    fn test_reject_empty_api_key() {
        let result = AnalysisClient::new("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_provider_setup_missing_api_key() {
        let provider = CloudAnalysisProvider::new();
        let result = provider.setup(&serde_json::json!({}));
        assert!(result.is_err());

        let result = provider.setup(&serde_json::json!({"apiKey": "  "}));
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_setup_stores_base_url() {
        let provider = CloudAnalysisProvider::new();
        let settings = provider
            .setup(&serde_json::json!({"apiKey": "test_key", "baseUrl": "http://localhost:9000"}))
            .unwrap();
        assert_eq!(settings["apiKey"], "test_key");
        assert_eq!(settings["baseUrl"], "http://localhost:9000");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AnalysisClient::new_with_base_url("test_key", "http://localhost/api/").unwrap();
        assert_eq!(client.base_url, "http://localhost/api");
    }

    #[test]
    fn test_missing_file_errors_before_request() {
        let client = AnalysisClient::new_with_base_url("test_key", "http://localhost:1").unwrap();
        let result = client.analyze_receipt(Path::new("/nonexistent/receipt.jpg"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("File not found"));
    }
}
