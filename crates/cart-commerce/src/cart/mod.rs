//! Shopping cart module.
//!
//! Contains the cart item model, line identity, unit price resolution,
//! the reducer and the persisted record format.

mod identity;
mod item;
mod pricing;
mod record;
mod reducer;
mod unit_price;

pub use identity::ItemKey;
pub use item::{CartItem, CartState, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartPricing, LineItemPricing};
pub use record::{PersistedCartRecord, RecordFormat};
pub use reducer::{reduce, CartAction};
pub use unit_price::{
    base_price, cart_item_unit_price, ensure_unit_price, resolve_unit_price, variant_effect,
    variant_set_price, PriceTier, VariantEffect, PRICE_TIERS,
};
