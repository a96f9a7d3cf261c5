//! Pure cart state transitions.
//!
//! `reduce` maps a state and an action to the next state. It performs no
//! I/O and has no failure path: actions that cannot apply leave the state
//! unchanged.

use crate::cart::{ensure_unit_price, CartItem, CartState, ItemKey, MAX_QUANTITY_PER_ITEM};
use crate::money;

/// A cart mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Set the loading flag, nothing else.
    SetLoading(bool),
    /// Replace every item (load from storage, refresh from the catalog).
    SetCart(Vec<CartItem>),
    /// Add an item, merging with an existing line of the same identity.
    AddItem(CartItem),
    /// Remove every line matching the key.
    RemoveItem(ItemKey),
    /// Set the quantity of the matching line; zero or less removes it.
    UpdateQuantity { key: ItemKey, quantity: i64 },
    /// Remove everything.
    ClearCart,
}

impl CartAction {
    /// Short action name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::SetLoading(_) => "set_loading",
            CartAction::SetCart(_) => "set_cart",
            CartAction::AddItem(_) => "add_item",
            CartAction::RemoveItem(_) => "remove_item",
            CartAction::UpdateQuantity { .. } => "update_quantity",
            CartAction::ClearCart => "clear_cart",
        }
    }

    /// Check if this action is a user edit of the cart contents.
    pub fn is_user_edit(&self) -> bool {
        matches!(
            self,
            CartAction::AddItem(_)
                | CartAction::RemoveItem(_)
                | CartAction::UpdateQuantity { .. }
                | CartAction::ClearCart
        )
    }
}

/// Apply an action to a state, producing the next state.
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    match action {
        CartAction::SetLoading(loading) => CartState {
            loading,
            ..state.clone()
        },
        CartAction::SetCart(items) => {
            let mut normalized = Vec::with_capacity(items.len());
            for item in items {
                insert_or_merge(&mut normalized, item);
            }
            CartState::with_items(normalized, false)
        }
        CartAction::AddItem(item) => {
            if item.quantity <= 0 {
                return state.clone();
            }
            let mut items = state.items.clone();
            insert_or_merge(&mut items, item);
            CartState::with_items(items, state.loading)
        }
        CartAction::RemoveItem(key) => remove_item(state, &key),
        CartAction::UpdateQuantity { key, quantity } => {
            if quantity <= 0 {
                return remove_item(state, &key);
            }
            let quantity = quantity.min(MAX_QUANTITY_PER_ITEM);
            let items = state
                .items
                .iter()
                .cloned()
                .map(|mut item| {
                    if key.matches(&item) {
                        item.quantity = quantity;
                    }
                    item
                })
                .collect();
            CartState::with_items(items, state.loading)
        }
        CartAction::ClearCart => CartState::default(),
    }
}

fn remove_item(state: &CartState, key: &ItemKey) -> CartState {
    let items = state
        .items
        .iter()
        .filter(|item| !key.matches(item))
        .cloned()
        .collect();
    CartState::with_items(items, state.loading)
}

/// Normalise an item and either append it or merge it into the line with
/// the same identity. Items without a positive quantity are dropped.
///
/// A merge can replace the line's variant fields, so the merged line may
/// now share an identity with another line; such lines are folded into it.
fn insert_or_merge(items: &mut Vec<CartItem>, item: CartItem) {
    if item.quantity <= 0 {
        return;
    }
    let mut incoming = ensure_unit_price(item);
    let key = incoming.key();

    let Some(index) = items.iter().position(|existing| key.matches(existing)) else {
        incoming.quantity = incoming.quantity.min(MAX_QUANTITY_PER_ITEM);
        items.push(incoming);
        return;
    };

    let mut merged = merge(&items[index], incoming);
    let merged_key = merged.key();
    let mut slot = 0;
    let mut rest = Vec::with_capacity(items.len());
    for (i, existing) in std::mem::take(items).into_iter().enumerate() {
        if i == index {
            slot = rest.len();
        } else if merged_key.matches(&existing) {
            merged.quantity = merged
                .quantity
                .saturating_add(existing.quantity)
                .min(MAX_QUANTITY_PER_ITEM);
        } else {
            rest.push(existing);
        }
    }
    rest.insert(slot, merged);
    *items = rest;
}

fn merge(existing: &CartItem, incoming: CartItem) -> CartItem {
    let mut merged = existing.clone();
    merged.quantity = existing
        .quantity
        .saturating_add(incoming.quantity)
        .min(MAX_QUANTITY_PER_ITEM);

    if incoming.variant_id.is_some() || incoming.variant.is_some() {
        merged.variant_id = incoming.variant_id;
        merged.variant = incoming.variant;
    }
    if incoming.variant_set.is_some() {
        merged.variant_set = incoming.variant_set;
    }
    if money::finite(incoming.base_unit_price_snapshot).is_some() {
        merged.base_unit_price_snapshot = incoming.base_unit_price_snapshot;
    }
    if incoming.product_snapshot.is_some() {
        merged.product_snapshot = incoming.product_snapshot;
    }
    if incoming.special_instructions.is_some() {
        merged.special_instructions = incoming.special_instructions;
    }

    ensure_unit_price(merged)
}
