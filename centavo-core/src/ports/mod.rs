//! Trait definitions for external dependencies

pub mod analysis;

pub use analysis::{
    DocumentAnalysisProvider, IntegrationProvider, ReceiptAnalysis, VoiceAnalysis,
};
