//! Product catalog collaborator.

use crate::CatalogError;
use async_trait::async_trait;
use cart_commerce::{catalog::Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Response envelope of a product lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFetch {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Product>,
}

impl ProductFetch {
    /// Successful lookup.
    pub fn found(product: Product) -> Self {
        Self {
            success: true,
            data: Some(product),
        }
    }

    /// Lookup that found nothing.
    pub fn not_found() -> Self {
        Self {
            success: false,
            data: None,
        }
    }

    /// The product, if the lookup succeeded and carried one.
    pub fn into_product(self) -> Option<Product> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// Remote product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch the current record for a product.
    async fn fetch_product_by_id(&self, id: ProductId) -> Result<ProductFetch, CatalogError>;
}

#[async_trait]
impl<C: ProductCatalog + ?Sized> ProductCatalog for Arc<C> {
    async fn fetch_product_by_id(&self, id: ProductId) -> Result<ProductFetch, CatalogError> {
        (**self).fetch_product_by_id(id).await
    }
}

/// Catalog held in memory.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: HashMap<ProductId, Product>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from products.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Parse a JSON array of products.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        Ok(Self::from_products(products))
    }

    /// Look up a product without the response envelope.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn fetch_product_by_id(&self, id: ProductId) -> Result<ProductFetch, CatalogError> {
        Ok(match self.get(id) {
            Some(product) => ProductFetch::found(product.clone()),
            None => ProductFetch::not_found(),
        })
    }
}
