//! Loosely-typed analysis payloads
//!
//! The analysis endpoints return JSON whose shape varies between provider
//! versions: fields are optional, several names are accepted for the same
//! value, and amounts arrive as numbers or strings. The types here absorb
//! that variance and reconcile it into canonical values the rest of the
//! system can rely on.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::movement::MovementKind;

/// Where a receipt's canonical total came from
///
/// The fallback order is fixed: `totals` wins over `summary`, which wins
/// over `totalAmount`, which wins over summing the line items. A payload
/// with none of these resolves to zero with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    Totals,
    Summary,
    TotalAmount,
    ItemSum,
    Missing,
}

/// Canonical total with its provenance
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTotal {
    pub amount: Decimal,
    pub source: TotalSource,
}

/// Extraction result for a scanned receipt image
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionPayload {
    #[serde(default, alias = "store", alias = "vendor")]
    pub merchant: Option<String>,
    /// ISO date string, several key spellings observed in the wild
    #[serde(default, alias = "purchaseDate", alias = "transactionDate")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub totals: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub summary: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, alias = "products", alias = "lineItems")]
    pub items: Vec<ExtractedItem>,
}

/// A single extracted line item
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedItem {
    #[serde(default, alias = "description", alias = "product")]
    pub name: Option<String>,
    #[serde(default, alias = "qty", deserialize_with = "de_opt_amount")]
    pub quantity: Option<Decimal>,
    #[serde(default, alias = "price", deserialize_with = "de_opt_amount")]
    pub unit_price: Option<Decimal>,
    #[serde(default, alias = "lineTotal", alias = "amount", deserialize_with = "de_opt_amount")]
    pub total: Option<Decimal>,
}

/// A reconciled line item with all gaps filled
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl ExtractionPayload {
    /// Parse a raw provider response body
    ///
    /// Returns None on malformed JSON; callers fall back to an empty payload
    /// and surface a warning rather than failing the whole scan.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Resolve the canonical receipt total
    ///
    /// Fallback chain: totals > summary > totalAmount > sum of line items > zero.
    pub fn resolve_total(&self) -> ResolvedTotal {
        if let Some(amount) = self.totals {
            return ResolvedTotal {
                amount,
                source: TotalSource::Totals,
            };
        }
        if let Some(amount) = self.summary {
            return ResolvedTotal {
                amount,
                source: TotalSource::Summary,
            };
        }
        if let Some(amount) = self.total_amount {
            return ResolvedTotal {
                amount,
                source: TotalSource::TotalAmount,
            };
        }

        let reconciled = self.reconcile_items();
        if !reconciled.is_empty() {
            let sum: Decimal = reconciled.iter().map(|i| i.line_total).sum();
            return ResolvedTotal {
                amount: sum,
                source: TotalSource::ItemSum,
            };
        }

        ResolvedTotal {
            amount: Decimal::ZERO,
            source: TotalSource::Missing,
        }
    }

    /// Reconcile line items, filling missing fields where derivable
    ///
    /// - missing quantity defaults to 1
    /// - missing unit price is derived from line total / quantity
    /// - missing line total is derived from quantity * unit price
    ///
    /// Items with no name and no amounts are dropped.
    pub fn reconcile_items(&self) -> Vec<ReconciledItem> {
        self.items
            .iter()
            .filter_map(|item| {
                let has_amount =
                    item.unit_price.is_some() || item.total.is_some();
                let name = item.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
                if name.is_none() && !has_amount {
                    return None;
                }

                let quantity = item.quantity.filter(|q| *q > Decimal::ZERO).unwrap_or(Decimal::ONE);

                let (unit_price, line_total) = match (item.unit_price, item.total) {
                    (Some(unit), Some(total)) => (unit, total),
                    (Some(unit), None) => (unit, unit * quantity),
                    (None, Some(total)) => (total / quantity, total),
                    (None, None) => (Decimal::ZERO, Decimal::ZERO),
                };

                Some(ReconciledItem {
                    name: name.unwrap_or("Unnamed item").to_string(),
                    quantity,
                    unit_price,
                    line_total,
                })
            })
            .collect()
    }

    /// Parse the purchase date if present and well-formed
    pub fn resolve_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
            .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
            .ok()
    }
}

/// Transcription result for a recorded voice note
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicePayload {
    #[serde(default, alias = "total", alias = "value", deserialize_with = "de_opt_amount")]
    pub amount: Option<Decimal>,
    /// "income" / "expense" / "saving" hint from the transcription model
    #[serde(default, alias = "type", alias = "movementType")]
    pub kind: Option<String>,
    #[serde(default, alias = "categoryName")]
    pub category: Option<String>,
    #[serde(default, alias = "text", alias = "transcript")]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl VoicePayload {
    /// Parse a raw provider response body; None on malformed JSON
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Resolve the movement kind hint; unknown or missing defaults to expense
    pub fn resolve_kind(&self) -> MovementKind {
        self.kind
            .as_deref()
            .and_then(MovementKind::parse)
            .unwrap_or(MovementKind::Expense)
    }

    /// Parse the spoken date if present and well-formed
    pub fn resolve_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// Deserialize an optional amount that can be a JSON number or string
fn de_opt_amount<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        Some(JsonValue::Number(n)) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid decimal: {}", e)))
        }
        Some(JsonValue::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<Decimal>()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid decimal: {}", e)))
        }
        Some(JsonValue::Null) | None => Ok(None),
        _ => Err(D::Error::custom("expected number or string for amount")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_precedence_totals_wins() {
        let payload = ExtractionPayload::parse(
            r#"{"totals": 42.50, "summary": 10.00, "totalAmount": 5.00}"#,
        )
        .unwrap();
        let resolved = payload.resolve_total();
        assert_eq!(resolved.amount, Decimal::new(4250, 2));
        assert_eq!(resolved.source, TotalSource::Totals);
    }

    #[test]
    fn test_total_precedence_summary_over_total_amount() {
        let payload =
            ExtractionPayload::parse(r#"{"summary": "10.00", "totalAmount": 5.00}"#).unwrap();
        let resolved = payload.resolve_total();
        assert_eq!(resolved.amount, Decimal::new(1000, 2));
        assert_eq!(resolved.source, TotalSource::Summary);
    }

    #[test]
    fn test_total_precedence_total_amount() {
        let payload = ExtractionPayload::parse(r#"{"totalAmount": 5.25}"#).unwrap();
        let resolved = payload.resolve_total();
        assert_eq!(resolved.amount, Decimal::new(525, 2));
        assert_eq!(resolved.source, TotalSource::TotalAmount);
    }

    #[test]
    fn test_total_falls_back_to_item_sum() {
        let payload = ExtractionPayload::parse(
            r#"{"items": [
                {"name": "Milk", "qty": 2, "price": "1.50"},
                {"name": "Bread", "lineTotal": 2.25}
            ]}"#,
        )
        .unwrap();
        let resolved = payload.resolve_total();
        assert_eq!(resolved.amount, Decimal::new(525, 2)); // 2*1.50 + 2.25
        assert_eq!(resolved.source, TotalSource::ItemSum);
    }

    #[test]
    fn test_total_missing_resolves_to_zero() {
        let payload = ExtractionPayload::parse(r#"{"merchant": "Corner Market"}"#).unwrap();
        let resolved = payload.resolve_total();
        assert_eq!(resolved.amount, Decimal::ZERO);
        assert_eq!(resolved.source, TotalSource::Missing);
    }

    #[test]
    fn test_amounts_accept_numbers_and_strings() {
        let payload =
            ExtractionPayload::parse(r#"{"totals": "42.50"}"#).unwrap();
        assert_eq!(payload.totals, Some(Decimal::new(4250, 2)));

        let payload = ExtractionPayload::parse(r#"{"totals": 42.5}"#).unwrap();
        assert_eq!(payload.totals, Some(Decimal::new(425, 1)));
    }

    #[test]
    fn test_merchant_aliases() {
        for body in [
            r#"{"merchant": "Corner Market"}"#,
            r#"{"store": "Corner Market"}"#,
            r#"{"vendor": "Corner Market"}"#,
        ] {
            let payload = ExtractionPayload::parse(body).unwrap();
            assert_eq!(payload.merchant.as_deref(), Some("Corner Market"));
        }
    }

    #[test]
    fn test_item_aliases() {
        let payload = ExtractionPayload::parse(
            r#"{"products": [{"product": "Eggs", "qty": "1", "price": 3.99}]}"#,
        )
        .unwrap();
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].name.as_deref(), Some("Eggs"));
    }

    #[test]
    fn test_reconcile_missing_quantity_defaults_to_one() {
        let payload = ExtractionPayload::parse(
            r#"{"items": [{"name": "Coffee", "price": 4.50}]}"#,
        )
        .unwrap();
        let items = payload.reconcile_items();
        assert_eq!(items[0].quantity, Decimal::ONE);
        assert_eq!(items[0].line_total, Decimal::new(450, 2));
    }

    #[test]
    fn test_reconcile_unit_price_from_total() {
        let payload = ExtractionPayload::parse(
            r#"{"items": [{"name": "Apples", "qty": 4, "lineTotal": "6.00"}]}"#,
        )
        .unwrap();
        let items = payload.reconcile_items();
        assert_eq!(items[0].unit_price, Decimal::new(150, 2));
        assert_eq!(items[0].line_total, Decimal::new(600, 2));
    }

    #[test]
    fn test_reconcile_drops_empty_items() {
        let payload = ExtractionPayload::parse(
            r#"{"items": [{}, {"name": "  "}, {"name": "Juice", "price": 2.00}]}"#,
        )
        .unwrap();
        let items = payload.reconcile_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Juice");
    }

    #[test]
    fn test_parse_failure_returns_none() {
        assert!(ExtractionPayload::parse("not json at all").is_none());
        assert!(VoicePayload::parse("<html>502</html>").is_none());
    }

    #[test]
    fn test_voice_kind_defaults_to_expense() {
        let payload = VoicePayload::parse(r#"{"amount": 12.00}"#).unwrap();
        assert_eq!(payload.resolve_kind(), MovementKind::Expense);

        let payload = VoicePayload::parse(r#"{"amount": 12.00, "type": "income"}"#).unwrap();
        assert_eq!(payload.resolve_kind(), MovementKind::Income);

        let payload = VoicePayload::parse(r#"{"amount": 12.00, "kind": "refund"}"#).unwrap();
        assert_eq!(payload.resolve_kind(), MovementKind::Expense);
    }

    #[test]
    fn test_date_formats() {
        let payload = ExtractionPayload::parse(r#"{"date": "2025-03-14"}"#).unwrap();
        assert_eq!(
            payload.resolve_date(),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );

        let payload = ExtractionPayload::parse(r#"{"purchaseDate": "14/03/2025"}"#).unwrap();
        assert_eq!(
            payload.resolve_date(),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );

        let payload = ExtractionPayload::parse(r#"{"date": "yesterday"}"#).unwrap();
        assert_eq!(payload.resolve_date(), None);
    }
}
