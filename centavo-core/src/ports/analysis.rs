//! Document analysis provider port
//!
//! Defines the interface for extracting structured data from receipt images
//! and voice notes. Implementations call an external analysis endpoint or
//! return canned demo payloads.

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::domain::result::Result;
use crate::domain::{ExtractionPayload, VoicePayload};

/// Result of analyzing a receipt image
#[derive(Debug, Default)]
pub struct ReceiptAnalysis {
    pub payload: ExtractionPayload,
    pub warnings: Vec<String>,
}

/// Result of analyzing a voice note
#[derive(Debug, Default)]
pub struct VoiceAnalysis {
    pub payload: VoicePayload,
    pub warnings: Vec<String>,
}

/// Document analysis provider trait
///
/// Implementations turn raw media files into loosely-typed payloads.
/// The AnalysisService uses this trait to reconcile payloads into the
/// domain model without knowing the specifics of each provider.
pub trait DocumentAnalysisProvider: Send + Sync {
    /// Provider name (e.g., "cloud", "demo")
    fn name(&self) -> &str;

    /// Whether this provider can analyze receipt images
    fn can_analyze_receipts(&self) -> bool;

    /// Whether this provider can analyze voice notes
    fn can_analyze_voice(&self) -> bool;

    /// Analyze a receipt image
    ///
    /// # Arguments
    /// * `image_path` - Path to the image file on disk
    /// * `settings` - Provider-specific settings (e.g., API keys)
    fn analyze_receipt(&self, image_path: &Path, settings: &JsonValue) -> Result<ReceiptAnalysis>;

    /// Analyze a voice note
    ///
    /// # Arguments
    /// * `audio_path` - Path to the audio file on disk
    /// * `settings` - Provider-specific settings
    fn analyze_voice(&self, audio_path: &Path, settings: &JsonValue) -> Result<VoiceAnalysis>;
}

/// Integration provider trait
///
/// Implementations handle setting up integrations (e.g., validating an API
/// key against the analysis endpoint, enabling demo mode).
pub trait IntegrationProvider: Send + Sync {
    /// Set up a new integration
    ///
    /// # Arguments
    /// * `options` - Provider-specific setup options (e.g., the API key)
    ///
    /// # Returns
    /// Settings to store for this integration
    fn setup(&self, options: &JsonValue) -> Result<JsonValue>;
}
