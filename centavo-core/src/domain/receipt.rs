//! Receipt domain model

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A scanned receipt with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub merchant: Option<String>,
    /// Reconciled total from the extraction payload, not the sum of items
    /// (items may be incomplete)
    pub total: Decimal,
    pub currency: String,
    pub purchased_date: NaiveDate,
    /// Hash for re-scan protection
    pub fingerprint: Option<String>,
    /// Raw provider payload pass-through
    pub extraction: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<ReceiptItem>,
}

/// A single line item on a receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl Receipt {
    /// Create a new receipt with required fields
    pub fn new(id: Uuid, total: Decimal, currency: impl Into<String>, purchased_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id,
            merchant: None,
            total,
            currency: currency.into(),
            purchased_date,
            fingerprint: None,
            extraction: None,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    /// Ensure fingerprint is set
    pub fn ensure_fingerprint(&mut self) {
        if self.fingerprint.is_none() {
            self.fingerprint = Some(self.calculate_fingerprint());
        }
    }

    /// Calculate fingerprint hash for re-scan deduplication
    ///
    /// Uses: purchase date, total, and normalized merchant name.
    ///
    /// Merchant normalization handles OCR noise:
    /// - Removes literal "null" strings
    /// - Normalizes store/register numbers to last 4 digits
    /// - Removes whitespace and special characters
    pub fn calculate_fingerprint(&self) -> String {
        let date = self.purchased_date.format("%Y-%m-%d").to_string();

        // Normalize total: treat -0 as 0
        let total = if self.total == Decimal::ZERO {
            Decimal::ZERO.abs()
        } else {
            self.total
        };
        let total_normalized = format!("{:.2}", total);

        let merchant_normalized = Self::normalize_merchant(self.merchant.as_deref());

        let fingerprint_str = format!("{}|{}|{}", date, total_normalized, merchant_normalized);

        // SHA256 hash, truncated to 16 chars
        let mut hasher = Sha256::new();
        hasher.update(fingerprint_str.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8]) // 16 hex chars
    }

    /// Normalize merchant name for fingerprint comparison
    fn normalize_merchant(merchant: Option<&str>) -> String {
        let merchant = merchant.unwrap_or("").to_lowercase();

        // Remove literal "null" strings (OCR artifacts)
        let null_re = Regex::new(r"\bnull\b").unwrap();
        let mut normalized = null_re.replace_all(&merchant, "").to_string();

        // Normalize store/register numbers (7-12 digits), keep only last 4
        let number_re = Regex::new(r"[0-9]{7,12}").unwrap();
        normalized = number_re
            .replace_all(&normalized, |caps: &regex::Captures| {
                let text = caps.get(0).unwrap().as_str();
                text[text.len() - 4..].to_string()
            })
            .to_string();

        // Remove whitespace
        let whitespace_re = Regex::new(r"\s+").unwrap();
        normalized = whitespace_re.replace_all(&normalized, "").to_string();

        // Remove all special characters, keep only alphanumeric
        let special_re = Regex::new(r"[^a-z0-9]").unwrap();
        special_re.replace_all(&normalized, "").to_string()
    }
}

impl ReceiptItem {
    pub fn new(receipt_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_id,
            name: name.into(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            line_total: Decimal::ZERO,
        }
    }
}

// Need hex encoding for fingerprint
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
