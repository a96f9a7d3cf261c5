//! Product and variant records as served by the catalog.

use crate::ids::{ProductId, VariantId};
use crate::money::{self, lenient_amount};
use serde::{Deserialize, Deserializer, Serialize};

/// How a variant's amount combines with the product's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceBehavior {
    /// The amount is added on top of the current price.
    #[default]
    Additive,
    /// The amount replaces the base price.
    Override,
}

impl PriceBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBehavior::Additive => "additive",
            PriceBehavior::Override => "override",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "additive" => Some(PriceBehavior::Additive),
            "override" => Some(PriceBehavior::Override),
            _ => None,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Image URLs, first is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// List price before any sale.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_price: Option<f64>,
    /// Sale price, honoured only when below the base price.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<f64>,
    /// Server-computed final price; wins when positive.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_price: Option<f64>,
    /// Purchasable variants.
    #[serde(default)]
    pub variants: Vec<VariantRef>,
    /// Units in stock, when the catalog reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
}

impl Product {
    /// Create a product with a base price and no variants.
    pub fn new(id: ProductId, name: impl Into<String>, base_price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            base_price: Some(base_price),
            ..Self::default()
        }
    }

    /// Price a customer pays for the product before variant adjustments.
    ///
    /// Prefers a positive final price, then a sale price that undercuts the
    /// base price, then the base price, then any positive sale price.
    /// Falls back to zero.
    pub fn effective_price(&self) -> f64 {
        let base = money::positive(self.base_price);
        let sale = money::positive(self.sale_price);

        if let Some(final_price) = money::positive(self.final_price) {
            return final_price;
        }
        if let (Some(sale), Some(base)) = (sale, base) {
            if sale < base {
                return sale;
            }
        }
        base.or(sale).unwrap_or(0.0)
    }

    /// Look up a variant by id.
    pub fn variant(&self, id: VariantId) -> Option<&VariantRef> {
        self.variants.iter().find(|v| v.id == id)
    }
}

/// A selected variant and its pricing rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VariantRef {
    /// Variant identifier.
    pub id: VariantId,
    /// Display name (e.g., "Large").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pricing rule; absent until normalised.
    #[serde(
        default,
        deserialize_with = "lenient_behavior",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_behavior: Option<PriceBehavior>,
    /// Lower wins among overrides; absent sorts last.
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub override_priority: Option<i64>,
    /// Override price or additive adjustment.
    #[serde(
        default,
        alias = "price",
        alias = "priceAdjustment",
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    /// Units in stock for this variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
}

impl VariantRef {
    /// Create an additive variant.
    pub fn additive(id: VariantId, amount: f64) -> Self {
        Self {
            id,
            price_behavior: Some(PriceBehavior::Additive),
            amount: Some(amount),
            ..Self::default()
        }
    }

    /// Create an override variant with an optional priority.
    pub fn override_price(id: VariantId, amount: f64, priority: Option<i64>) -> Self {
        Self {
            id,
            price_behavior: Some(PriceBehavior::Override),
            override_priority: priority,
            amount: Some(amount),
            ..Self::default()
        }
    }

    /// Pricing rule, defaulting to additive.
    pub fn behavior(&self) -> PriceBehavior {
        self.price_behavior.unwrap_or_default()
    }

    /// Check if this variant is an override candidate.
    pub fn is_override(&self) -> bool {
        self.behavior() == PriceBehavior::Override
    }

    /// Copy with pricing metadata made explicit.
    pub fn normalized(&self) -> Self {
        Self {
            price_behavior: Some(self.behavior()),
            amount: money::finite(self.amount),
            ..self.clone()
        }
    }
}

fn lenient_behavior<'de, D>(deserializer: D) -> Result<Option<PriceBehavior>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(PriceBehavior::from_str))
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(money::coerce_amount)
        .filter(|p| p.fract() == 0.0)
        .map(|p| p as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effective_price_prefers_final() {
        let product = Product {
            base_price: Some(20.0),
            sale_price: Some(15.0),
            final_price: Some(12.0),
            ..Product::new(ProductId::new(1), "Tea", 20.0)
        };
        assert_eq!(product.effective_price(), 12.0);
    }

    #[test]
    fn test_effective_price_sale_below_base() {
        let mut product = Product::new(ProductId::new(1), "Tea", 20.0);
        product.sale_price = Some(15.0);
        assert_eq!(product.effective_price(), 15.0);

        product.sale_price = Some(25.0);
        assert_eq!(product.effective_price(), 20.0);
    }

    #[test]
    fn test_effective_price_fallbacks() {
        let mut product = Product::default();
        assert_eq!(product.effective_price(), 0.0);

        product.sale_price = Some(4.0);
        assert_eq!(product.effective_price(), 4.0);

        product.base_price = Some(-3.0);
        assert_eq!(product.effective_price(), 4.0);
    }

    #[test]
    fn test_product_from_loose_json() {
        let product: Product = serde_json::from_value(json!({
            "id": 9,
            "name": "Coffee",
            "basePrice": "10.00",
            "salePrice": null,
            "variants": [
                {"id": 1, "priceBehavior": "OVERRIDE", "overridePriority": "2", "price": 8},
                {"id": 2, "priceBehavior": "bogus", "priceAdjustment": "1.5"}
            ]
        }))
        .unwrap();

        assert_eq!(product.base_price, Some(10.0));
        assert_eq!(product.sale_price, None);
        let first = product.variant(VariantId::new(1)).unwrap();
        assert_eq!(first.behavior(), PriceBehavior::Override);
        assert_eq!(first.override_priority, Some(2));
        assert_eq!(first.amount, Some(8.0));
        let second = product.variant(VariantId::new(2)).unwrap();
        assert_eq!(second.price_behavior, None);
        assert_eq!(second.behavior(), PriceBehavior::Additive);
        assert_eq!(second.amount, Some(1.5));
    }

    #[test]
    fn test_variant_normalized() {
        let raw = VariantRef {
            id: VariantId::new(3),
            amount: Some(f64::NAN),
            ..VariantRef::default()
        };
        let normalized = raw.normalized();
        assert_eq!(normalized.price_behavior, Some(PriceBehavior::Additive));
        assert_eq!(normalized.amount, None);
        assert_eq!(normalized.normalized(), normalized);
    }
}
