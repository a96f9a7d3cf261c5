//! Cart domain types and logic.
//!
//! This crate holds the pure half of the cart engine:
//!
//! - **Catalog**: product and variant records with their pricing rules
//! - **Cart**: items, line identity, unit price resolution, the reducer
//! - **Record**: the on-device storage format, including the legacy layout
//!
//! # Example
//!
//! ```rust
//! use cart_commerce::prelude::*;
//!
//! let product = Product::new(ProductId::new(1), "Cold brew", 10.0);
//! let item = CartItem::from_product(product, 2)
//!     .with_variant_set(vec![VariantRef::additive(VariantId::new(7), 2.5)]);
//!
//! let state = reduce(&CartState::default(), CartAction::AddItem(item));
//! assert_eq!(state.item_count, 2);
//! assert_eq!(state.total_amount, 25.0);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::CommerceError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;

    // Catalog
    pub use crate::catalog::{PriceBehavior, Product, VariantRef};

    // Cart
    pub use crate::cart::{
        cart_item_unit_price, ensure_unit_price, reduce, CartAction, CartItem, CartPricing,
        CartState, ItemKey, PersistedCartRecord, RecordFormat,
    };
}
