//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cart_commerce::catalog::Product;
use cart_commerce::ProductId;
use cart_store::{KeyValueStore, MemoryStore, StoreError};
use cart_sync::{CatalogError, ProductCatalog, ProductFetch, StaticCatalog};
use std::time::Duration;
use tokio::sync::{watch, Semaphore};

/// Memory store whose reads and writes take `delay`.
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
    calls: watch::Sender<usize>,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        let (calls, _) = watch::channel(0);
        Self {
            inner: MemoryStore::new(),
            delay,
            calls,
        }
    }

    /// Backend without the delay, for seeding.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Wait until at least `n` storage calls have started.
    pub async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.calls.subscribe();
        let _ = rx.wait_for(|calls| *calls >= n).await;
    }

    async fn enter(&self) {
        self.calls.send_modify(|calls| *calls += 1);
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.enter().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.enter().await;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.enter().await;
        self.inner.remove(key).await
    }
}

/// Store that fails every call.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::StoreError("quota exceeded".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::StoreError("quota exceeded".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::StoreError("quota exceeded".to_string()))
    }
}

/// Catalog whose fetches block until the gate opens.
pub struct GatedCatalog {
    inner: StaticCatalog,
    gate: Semaphore,
    started: watch::Sender<usize>,
}

impl GatedCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let (started, _) = watch::channel(0);
        Self {
            inner: StaticCatalog::from_products(products),
            gate: Semaphore::new(0),
            started,
        }
    }

    /// Let every pending and future fetch through.
    pub fn open(&self) {
        self.gate.close();
    }

    /// Wait until at least `n` fetches are blocked on the gate.
    pub async fn wait_for_fetches(&self, n: usize) {
        let mut rx = self.started.subscribe();
        let _ = rx.wait_for(|started| *started >= n).await;
    }
}

#[async_trait]
impl ProductCatalog for GatedCatalog {
    async fn fetch_product_by_id(&self, id: ProductId) -> Result<ProductFetch, CatalogError> {
        self.started.send_modify(|started| *started += 1);
        let _ = self.gate.acquire().await;
        self.inner.fetch_product_by_id(id).await
    }
}

pub fn product(id: i64, name: &str, price: f64) -> Product {
    Product::new(ProductId::new(id), name, price)
}
