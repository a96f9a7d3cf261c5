//! Product catalog module.
//!
//! Contains the product and variant records the cart snapshots.

mod product;

pub use product::{PriceBehavior, Product, VariantRef};
