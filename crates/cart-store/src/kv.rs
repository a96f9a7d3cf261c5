//! Key-value store seam.

use crate::StoreError;
use async_trait::async_trait;
use std::sync::Arc;

/// On-device string storage.
///
/// Backends only deal in strings; callers own the value format.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}

/// Handle the cart engine reads and writes through.
///
/// Wraps any [`KeyValueStore`] backend, including shared `Arc` backends.
pub struct Store<S> {
    backend: S,
}

impl<S: KeyValueStore> Store<S> {
    /// Wrap a backend.
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Read a raw string value.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key).await
    }

    /// Write a raw string value.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(key, value).await
    }

    /// Delete a value.
    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = Store::new(MemoryStore::new());
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_arc_backend() {
        let shared = Arc::new(MemoryStore::new());
        let store = Store::new(Arc::clone(&shared));
        store.set("k", "v").await.unwrap();
        assert_eq!(shared.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
