//! Unit price resolution.
//!
//! Derives a line's effective unit price from its base price snapshot and
//! variant pricing rules. Every function here is pure and total: invalid
//! inputs fold to zero rather than failing, and the public entry point
//! never yields a negative or NaN price.

use crate::cart::CartItem;
use crate::catalog::{Product, VariantRef};
use crate::money;

/// Effect of a single variant's pricing rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantEffect {
    /// Replaces the base price with this amount.
    Override(f64),
    /// Adds this amount to the current price.
    Additive(f64),
    /// The rule does not apply (missing or unusable amount).
    None,
}

impl VariantEffect {
    /// Price this effect produces against a base price, if it applies.
    pub fn price_against(self, base: f64) -> Option<f64> {
        match self {
            VariantEffect::Override(price) => Some(price),
            VariantEffect::Additive(amount) => Some(base + amount),
            VariantEffect::None => None,
        }
    }
}

/// Evaluate a variant's pricing rule.
///
/// An override applies only with a positive amount; an additive rule
/// applies with any finite amount.
pub fn variant_effect(variant: &VariantRef) -> VariantEffect {
    match money::finite(variant.amount) {
        Some(amount) if variant.is_override() => {
            if amount > 0.0 {
                VariantEffect::Override(amount)
            } else {
                VariantEffect::None
            }
        }
        Some(amount) => VariantEffect::Additive(amount),
        None => VariantEffect::None,
    }
}

/// Base price for an item: the snapshot if finite, else the product's
/// effective price, else zero.
pub fn base_price(item: &CartItem) -> f64 {
    money::finite(item.base_unit_price_snapshot).unwrap_or_else(|| {
        item.product_snapshot
            .as_ref()
            .map(Product::effective_price)
            .unwrap_or(0.0)
    })
}

/// Index of the override candidate with the lowest priority; absent
/// priority sorts last and ties keep selection order.
fn top_override(variants: &[VariantRef]) -> Option<usize> {
    variants
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_override())
        .min_by_key(|(_, v)| v.override_priority.unwrap_or(i64::MAX))
        .map(|(index, _)| index)
}

/// Price for a multi-variant selection.
///
/// The top-priority override sets the price when it applies, and the
/// remaining additive variants are summed on top of it. Other override
/// candidates never compound with that winner. Without a winner the
/// remaining variants are walked in selection order from the base price,
/// and an applicable override re-bases the running price to its own amount.
pub fn variant_set_price(variants: &[VariantRef], base: f64) -> f64 {
    let top = top_override(variants);
    let winner = top.and_then(|index| match variant_effect(&variants[index]) {
        VariantEffect::Override(price) => Some(price),
        _ => None,
    });

    let rest = variants
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != top)
        .map(|(_, v)| variant_effect(v));

    match winner {
        Some(price) => rest.fold(price, |current, effect| match effect {
            VariantEffect::Additive(amount) => current + amount,
            _ => current,
        }),
        None => rest.fold(base, |current, effect| match effect {
            VariantEffect::Additive(amount) => current + amount,
            VariantEffect::Override(price) => base + (price - base),
            VariantEffect::None => current,
        }),
    }
}

/// Compute an item's unit price from its own fields.
///
/// May return zero, or a negative value when variant adjustments exceed
/// the base price; [`cart_item_unit_price`] applies the fallbacks.
pub fn resolve_unit_price(item: &CartItem) -> f64 {
    let base = base_price(item);

    if let Some(variants) = item.variant_set.as_deref().filter(|set| !set.is_empty()) {
        return variant_set_price(variants, base);
    }

    if let Some(price) = item
        .variant
        .as_ref()
        .and_then(|v| variant_effect(v).price_against(base))
        .filter(|price| *price > 0.0)
    {
        return price;
    }

    if base > 0.0 {
        return base;
    }

    money::finite(item.unit_price).unwrap_or(base)
}

/// One step of the unit price fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    /// The computed price, when finite and positive.
    Computed,
    /// The previously cached price, when positive.
    Cached,
    /// The computed price clamped to zero.
    Raw,
}

/// Fallback order applied by [`cart_item_unit_price`].
pub const PRICE_TIERS: [PriceTier; 3] = [PriceTier::Computed, PriceTier::Cached, PriceTier::Raw];

impl PriceTier {
    /// Price this tier yields, if it accepts the inputs.
    pub fn resolve(self, item: &CartItem, computed: f64) -> Option<f64> {
        match self {
            PriceTier::Computed => money::positive(Some(computed)),
            PriceTier::Cached => money::positive(item.unit_price),
            PriceTier::Raw => money::finite(Some(computed)).map(|p| p.max(0.0)),
        }
    }
}

/// Public unit price of an item, never negative or NaN.
pub fn cart_item_unit_price(item: &CartItem) -> f64 {
    let computed = resolve_unit_price(item);
    PRICE_TIERS
        .iter()
        .find_map(|tier| tier.resolve(item, computed))
        .unwrap_or(0.0)
}

/// Normalise an item before it enters cart state.
///
/// Hydrates the single variant from the product snapshot, makes variant
/// pricing explicit, attaches a base price snapshot when one can be derived
/// and recomputes the cached unit price. Idempotent.
pub fn ensure_unit_price(mut item: CartItem) -> CartItem {
    if item.variant.is_none() {
        if let (Some(variant_id), Some(product)) = (item.variant_id, &item.product_snapshot) {
            item.variant = product.variant(variant_id).cloned();
        }
    }

    item.variant = item.variant.as_ref().map(VariantRef::normalized);
    if let Some(set) = item.variant_set.as_mut() {
        for variant in set.iter_mut() {
            *variant = variant.normalized();
        }
    }

    if money::finite(item.base_unit_price_snapshot).is_none() {
        item.base_unit_price_snapshot =
            item.product_snapshot.as_ref().map(Product::effective_price);
    }

    item.unit_price = Some(cart_item_unit_price(&item));
    item
}
