//! Commerce error types.

use thiserror::Error;

/// Errors that can occur handling cart data.
///
/// The reducer and price engine never fail; these surface only from
/// parsing and serialising persisted records.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Stored data is not a cart record.
    #[error("Invalid cart record: {0}")]
    InvalidRecord(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
