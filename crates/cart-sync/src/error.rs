//! Error types for the cart controller.

use cart_commerce::{CommerceError, ProductId};
use cart_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Errors from the product catalog collaborator.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid catalog data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::InvalidData(e.to_string())
    }
}

/// Errors raised inside the controller.
///
/// These never cross the public controller API; they are logged and folded
/// into outcomes there.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Record error: {0}")]
    Record(#[from] CommerceError),
}
