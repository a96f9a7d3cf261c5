//! Line identity: deciding whether two cart entries are the same line.
//!
//! A line is identified by its product plus whichever variant selection it
//! carries. Two variant representations exist side by side: a single
//! `variant_id`, and a `variant_set` of simultaneously selected variants.
//! They are never cross-compared, so a single id `5` does not match the set
//! `{5}`.

use crate::cart::CartItem;
use crate::ids::{ProductId, VariantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identity of a cart line, used to merge, update and remove items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Product identifier.
    pub product_id: ProductId,
    /// Single selected variant.
    pub variant_id: Option<VariantId>,
    /// Multi-variant selection; empty means absent.
    pub variant_set: BTreeSet<VariantId>,
}

impl ItemKey {
    /// Key for a product without variants.
    pub fn product(product_id: ProductId) -> Self {
        Self {
            product_id,
            variant_id: None,
            variant_set: BTreeSet::new(),
        }
    }

    /// Set the single variant.
    pub fn with_variant(mut self, variant_id: VariantId) -> Self {
        self.variant_id = Some(variant_id);
        self
    }

    /// Set the multi-variant selection.
    pub fn with_variant_set(mut self, ids: impl IntoIterator<Item = VariantId>) -> Self {
        self.variant_set = ids.into_iter().collect();
        self
    }

    /// Build a key from optional parts, as the UI passes them.
    pub fn from_parts(
        product_id: ProductId,
        variant_id: Option<VariantId>,
        variant_set: Option<&[VariantId]>,
    ) -> Self {
        Self {
            product_id,
            variant_id,
            variant_set: variant_set
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
        }
    }

    /// Check whether two keys denote the same line.
    ///
    /// Same product, then: if both sides carry a single variant id compare
    /// those; otherwise if either side carries a non-empty set compare the
    /// sets ignoring order; otherwise match only when neither side carries
    /// a variant at all.
    pub fn same_line(&self, other: &ItemKey) -> bool {
        if self.product_id != other.product_id {
            return false;
        }
        if let (Some(a), Some(b)) = (self.variant_id, other.variant_id) {
            return a == b;
        }
        if !self.variant_set.is_empty() || !other.variant_set.is_empty() {
            return self.variant_set == other.variant_set;
        }
        self.variant_id.is_none() && other.variant_id.is_none()
    }

    /// Check whether an item belongs to this line.
    pub fn matches(&self, item: &CartItem) -> bool {
        self.same_line(&item.key())
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "product:{}", self.product_id)?;
        if let Some(variant_id) = self.variant_id {
            write!(f, ":variant:{}", variant_id)?;
        }
        if !self.variant_set.is_empty() {
            let ids: Vec<String> = self.variant_set.iter().map(|id| id.to_string()).collect();
            write!(f, ":set:{}", ids.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: i64) -> ProductId {
        ProductId::new(id)
    }

    fn vid(id: i64) -> VariantId {
        VariantId::new(id)
    }

    #[test]
    fn test_plain_products() {
        assert!(ItemKey::product(pid(1)).same_line(&ItemKey::product(pid(1))));
        assert!(!ItemKey::product(pid(1)).same_line(&ItemKey::product(pid(2))));
    }

    #[test]
    fn test_single_variant_compare() {
        let a = ItemKey::product(pid(1)).with_variant(vid(5));
        assert!(a.same_line(&ItemKey::product(pid(1)).with_variant(vid(5))));
        assert!(!a.same_line(&ItemKey::product(pid(1)).with_variant(vid(6))));
        assert!(!a.same_line(&ItemKey::product(pid(1))));
    }

    #[test]
    fn test_single_id_preferred_over_set() {
        let a = ItemKey::product(pid(1))
            .with_variant(vid(5))
            .with_variant_set([vid(7)]);
        let b = ItemKey::product(pid(1)).with_variant(vid(5));
        assert!(a.same_line(&b));
        assert!(b.same_line(&a));
    }

    #[test]
    fn test_set_compare_ignores_order() {
        let a = ItemKey::product(pid(1)).with_variant_set([vid(3), vid(1)]);
        let b = ItemKey::product(pid(1)).with_variant_set([vid(1), vid(3)]);
        let c = ItemKey::product(pid(1)).with_variant_set([vid(1)]);
        assert!(a.same_line(&b));
        assert!(!a.same_line(&c));
    }

    #[test]
    fn test_representations_never_cross_compare() {
        let single = ItemKey::product(pid(1)).with_variant(vid(5));
        let set = ItemKey::product(pid(1)).with_variant_set([vid(5)]);
        assert!(!single.same_line(&set));
        assert!(!set.same_line(&single));
    }

    #[test]
    fn test_display() {
        let key = ItemKey::product(pid(1))
            .with_variant(vid(2))
            .with_variant_set([vid(4), vid(3)]);
        assert_eq!(key.to_string(), "product:1:variant:2:set:3,4");
    }
}
