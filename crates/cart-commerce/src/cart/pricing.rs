//! Cart pricing breakdown.

use crate::cart::{cart_item_unit_price, CartState, ItemKey};
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of line subtotals.
    pub subtotal: f64,
    /// Sum of quantities.
    pub item_count: i64,
    /// Per-line-item pricing breakdown.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Build the breakdown for a cart state.
    pub fn from_state(state: &CartState) -> Self {
        let line_items: Vec<LineItemPricing> = state
            .items
            .iter()
            .map(|item| {
                let unit_price = cart_item_unit_price(item);
                LineItemPricing {
                    key: item.key(),
                    name: item.display_name(),
                    unit_price,
                    quantity: item.quantity,
                    subtotal: unit_price * item.quantity as f64,
                }
            })
            .collect();

        Self {
            subtotal: line_items.iter().map(|l| l.subtotal).sum(),
            item_count: line_items.iter().map(|l| l.quantity).sum(),
            line_items,
        }
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Line identity.
    pub key: ItemKey,
    /// Display name.
    pub name: String,
    /// Resolved unit price.
    pub unit_price: f64,
    /// Quantity.
    pub quantity: i64,
    /// Subtotal (unit_price * quantity).
    pub subtotal: f64,
}
