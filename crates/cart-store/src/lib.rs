//! Async key-value storage for persisted carts.
//!
//! Provides the storage seam the cart engine persists through and two
//! backends: in-memory and one-file-per-key.
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_store::{FileStore, Store};
//!
//! let store = Store::new(FileStore::open("./data").await?);
//!
//! store.set("cart:user", &record.to_json()?).await?;
//! let raw = store.get("cart:user").await?;
//! store.delete("cart:user").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::{KeyValueStore, Store};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, KeyValueStore, MemoryStore, Store, StoreError};
}
