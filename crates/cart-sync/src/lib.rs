//! Cart synchronisation for the storefront client.
//!
//! This crate provides:
//! - `CartController` - The cart API screens call
//! - `PersistenceController` - Race-free load and save per identity mode
//! - `RefreshController` - Catalog refresh that never clobbers user edits
//! - `MutationTracker` - Version counter and removal grace window
//! - `ProductCatalog` - Remote catalog seam, with `StaticCatalog`
//! - `CartConfig` - Storage keys and timings

mod catalog;
mod config;
mod controller;
mod error;
mod persistence;
mod refresh;
mod session;
mod tracker;

pub use catalog::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use persistence::*;
pub use refresh::*;
pub use session::*;
pub use tracker::*;
