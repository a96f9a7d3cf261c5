//! Cart item and cart state types.

use crate::cart::{cart_item_unit_price, ItemKey};
use crate::catalog::{Product, VariantRef};
use crate::ids::{ProductId, VariantId};
use crate::money::lenient_amount;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// One logical line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Single selected variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    /// Hydrated record for `variant_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantRef>,
    /// Simultaneously selected variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_set: Option<Vec<VariantRef>>,
    /// Quantity, always positive while the item is in the cart.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Cached unit price, recomputed whenever the item is touched.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<f64>,
    /// Base price captured when the item was added.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_unit_price_snapshot: Option<f64>,
    /// Last known catalog record.
    #[serde(
        default,
        alias = "product",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_snapshot: Option<Product>,
    /// Customer note for this line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

impl CartItem {
    /// Create an item for a product id without any snapshot.
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            variant_id: None,
            variant: None,
            variant_set: None,
            quantity,
            unit_price: None,
            base_unit_price_snapshot: None,
            product_snapshot: None,
            special_instructions: None,
        }
    }

    /// Create an item carrying a product snapshot.
    pub fn from_product(product: Product, quantity: i64) -> Self {
        let mut item = Self::new(product.id, quantity);
        item.product_snapshot = Some(product);
        item
    }

    /// Select a single variant.
    pub fn with_variant(mut self, variant: VariantRef) -> Self {
        self.variant_id = Some(variant.id);
        self.variant = Some(variant);
        self
    }

    /// Select a single variant by id, to be hydrated from the snapshot.
    pub fn with_variant_id(mut self, variant_id: VariantId) -> Self {
        self.variant_id = Some(variant_id);
        self
    }

    /// Select several variants at once.
    pub fn with_variant_set(mut self, variants: Vec<VariantRef>) -> Self {
        self.variant_set = Some(variants);
        self
    }

    /// Attach a base price snapshot.
    pub fn with_base_price(mut self, base: f64) -> Self {
        self.base_unit_price_snapshot = Some(base);
        self
    }

    /// Attach a customer note.
    pub fn with_instructions(mut self, note: impl Into<String>) -> Self {
        self.special_instructions = Some(note.into());
        self
    }

    /// Identity of this line.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            product_id: self.product_id,
            variant_id: self.variant_id,
            variant_set: self
                .variant_set
                .iter()
                .flatten()
                .map(|v| v.id)
                .collect(),
        }
    }

    /// Display name from the snapshot, falling back to the product id.
    pub fn display_name(&self) -> String {
        self.product_snapshot
            .as_ref()
            .map(|p| p.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Product {}", self.product_id))
    }

    /// Resolved unit price times quantity.
    pub fn line_total(&self) -> f64 {
        cart_item_unit_price(self) * self.quantity as f64
    }
}

/// The authoritative in-memory cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Lines, unique by identity.
    pub items: Vec<CartItem>,
    /// Sum of quantities.
    pub item_count: i64,
    /// Sum of resolved line totals.
    pub total_amount: f64,
    /// True until the first load for the current identity mode completes.
    pub loading: bool,
}

impl CartState {
    /// State before anything has been loaded.
    pub fn initial() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Build a state from items, deriving the aggregates.
    pub fn with_items(items: Vec<CartItem>, loading: bool) -> Self {
        let item_count = items.iter().map(|i| i.quantity).sum();
        let total_amount = items.iter().map(CartItem::line_total).sum();
        Self {
            items,
            item_count,
            total_amount,
            loading,
        }
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line matching a key.
    pub fn get_item(&self, key: &ItemKey) -> Option<&CartItem> {
        self.items.iter().find(|item| key.matches(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_key_from_variant_set() {
        let item = CartItem::new(ProductId::new(1), 1).with_variant_set(vec![
            VariantRef::additive(VariantId::new(3), 1.0),
            VariantRef::additive(VariantId::new(2), 1.0),
        ]);
        let key = item.key();
        assert_eq!(key.variant_id, None);
        assert_eq!(
            key.variant_set.into_iter().collect::<Vec<_>>(),
            vec![VariantId::new(2), VariantId::new(3)]
        );
    }

    #[test]
    fn test_item_from_legacy_json() {
        let item: CartItem = serde_json::from_value(json!({
            "productId": 4,
            "variantId": 10,
            "unitPrice": "oops",
            "product": {"id": 4, "name": "Mug", "basePrice": 9.5}
        }))
        .unwrap();

        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, None);
        assert_eq!(item.product_snapshot.unwrap().name, "Mug");
    }

    #[test]
    fn test_state_aggregates() {
        let items = vec![
            CartItem::new(ProductId::new(1), 2).with_base_price(10.0),
            CartItem::new(ProductId::new(2), 1).with_base_price(2.5),
        ];
        let state = CartState::with_items(items, false);
        assert_eq!(state.item_count, 3);
        assert!((state.total_amount - 22.5).abs() < 1e-9);
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn test_display_name() {
        let item = CartItem::new(ProductId::new(8), 1);
        assert_eq!(item.display_name(), "Product 8");
        let item = CartItem::from_product(Product::new(ProductId::new(8), "Kettle", 30.0), 1);
        assert_eq!(item.display_name(), "Kettle");
    }
}
