//! On-device representation of a cart.
//!
//! Writes always produce the envelope `{ "items": [...], "timestamp": ms }`.
//! Reads also accept the legacy format, a bare array of items.

use crate::cart::CartItem;
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// A persisted cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedCartRecord {
    /// Items as they were in state when saved.
    pub items: Vec<CartItem>,
    /// Save time in epoch milliseconds; zero for legacy records.
    #[serde(default)]
    pub timestamp: i64,
}

/// Layout a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// `{ items, timestamp }`.
    Envelope,
    /// Bare array of items.
    Legacy,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCart {
    Envelope(PersistedCartRecord),
    Legacy(Vec<CartItem>),
}

impl PersistedCartRecord {
    /// Create a record stamped with the current time.
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            items,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Serialize to the envelope format.
    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse either the envelope or the legacy format.
    pub fn parse(raw: &str) -> Result<(Self, RecordFormat), CommerceError> {
        let stored: StoredCart = serde_json::from_str(raw).map_err(|e| {
            CommerceError::InvalidRecord(format!("not a cart envelope or item array: {}", e))
        })?;

        Ok(match stored {
            StoredCart::Envelope(record) => (record, RecordFormat::Envelope),
            StoredCart::Legacy(items) => (Self { items, timestamp: 0 }, RecordFormat::Legacy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    #[test]
    fn test_envelope_round_trip() {
        let record = PersistedCartRecord::new(vec![CartItem::new(ProductId::new(1), 2)]);
        let json = record.to_json().unwrap();
        let (parsed, format) = PersistedCartRecord::parse(&json).unwrap();

        assert_eq!(format, RecordFormat::Envelope);
        assert_eq!(parsed, record);
        assert!(parsed.timestamp > 0);
    }

    #[test]
    fn test_legacy_array() {
        let raw = r#"[{"productId": 3, "quantity": 1, "unitPrice": 4.5}]"#;
        let (parsed, format) = PersistedCartRecord::parse(raw).unwrap();

        assert_eq!(format, RecordFormat::Legacy);
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].unit_price, Some(4.5));
        assert_eq!(parsed.timestamp, 0);
    }

    #[test]
    fn test_envelope_without_timestamp() {
        let (parsed, format) = PersistedCartRecord::parse(r#"{"items": []}"#).unwrap();
        assert_eq!(format, RecordFormat::Envelope);
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            PersistedCartRecord::parse("{\"cart\": 1}"),
            Err(CommerceError::InvalidRecord(_))
        ));
        assert!(PersistedCartRecord::parse("not json").is_err());
    }
}
