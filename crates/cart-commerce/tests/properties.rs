use cart_commerce::cart::{cart_item_unit_price, ensure_unit_price, reduce, CartAction};
use cart_commerce::prelude::*;
use proptest::prelude::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn arb_behavior() -> impl Strategy<Value = Option<PriceBehavior>> {
    prop_oneof![
        Just(None),
        Just(Some(PriceBehavior::Additive)),
        Just(Some(PriceBehavior::Override)),
    ]
}

fn arb_amount() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(f64::NAN)),
        6 => (-10.0f64..40.0).prop_map(Some),
    ]
}

fn arb_variant() -> impl Strategy<Value = VariantRef> {
    (1i64..5, arb_behavior(), proptest::option::of(0i64..4), arb_amount()).prop_map(
        |(id, price_behavior, override_priority, amount)| VariantRef {
            id: VariantId::new(id),
            price_behavior,
            override_priority,
            amount,
            ..VariantRef::default()
        },
    )
}

fn arb_product(id: i64) -> impl Strategy<Value = Product> {
    (
        arb_amount(),
        arb_amount(),
        arb_amount(),
        proptest::collection::vec(arb_variant(), 0..3),
    )
        .prop_map(move |(base_price, sale_price, final_price, variants)| Product {
            id: ProductId::new(id),
            name: format!("Product {}", id),
            base_price,
            sale_price,
            final_price,
            variants,
            ..Product::default()
        })
}

fn arb_item() -> impl Strategy<Value = CartItem> {
    (1i64..4).prop_flat_map(|product_id| {
        (
            proptest::option::of(1i64..5),
            proptest::option::of(proptest::collection::vec(arb_variant(), 0..3)),
            1i64..5,
            arb_amount(),
            arb_amount(),
            proptest::option::of(arb_product(product_id)),
        )
            .prop_map(
                move |(variant_id, variant_set, quantity, unit_price, base, product)| CartItem {
                    variant_id: variant_id.map(VariantId::new),
                    variant_set,
                    unit_price,
                    base_unit_price_snapshot: base,
                    product_snapshot: product,
                    ..CartItem::new(ProductId::new(product_id), quantity)
                },
            )
    })
}

fn arb_action() -> impl Strategy<Value = CartAction> {
    prop_oneof![
        5 => arb_item().prop_map(CartAction::AddItem),
        2 => arb_item().prop_map(|item| CartAction::RemoveItem(item.key())),
        2 => (arb_item(), -1i64..6).prop_map(|(item, quantity)| CartAction::UpdateQuantity {
            key: item.key(),
            quantity,
        }),
        1 => Just(CartAction::ClearCart),
    ]
}

fn assert_invariants(state: &CartState) -> Result<(), TestCaseError> {
    let count: i64 = state.items.iter().map(|i| i.quantity).sum();
    prop_assert_eq!(state.item_count, count);

    let total: f64 = state
        .items
        .iter()
        .map(|i| cart_item_unit_price(i) * i.quantity as f64)
        .sum();
    prop_assert!(approx_eq(state.total_amount, total));
    prop_assert!(state.total_amount >= 0.0);

    for (i, a) in state.items.iter().enumerate() {
        prop_assert!(a.quantity > 0);
        for b in state.items.iter().skip(i + 1) {
            prop_assert!(
                !a.key().same_line(&b.key()),
                "duplicate lines {} and {}",
                a.key(),
                b.key()
            );
        }
    }
    Ok(())
}

proptest! {
    /// Normalising twice equals normalising once.
    #[test]
    fn prop_normalize_idempotent(item in arb_item()) {
        let once = ensure_unit_price(item);
        let twice = ensure_unit_price(once.clone());
        prop_assert_eq!(format!("{:?}", once), format!("{:?}", twice));
    }

    /// Resolved prices are never negative or NaN.
    #[test]
    fn prop_unit_price_is_safe(item in arb_item()) {
        let price = cart_item_unit_price(&item);
        prop_assert!(price.is_finite());
        prop_assert!(price >= 0.0);
    }

    /// Aggregates and identity uniqueness hold after any action sequence.
    #[test]
    fn prop_reachable_states_hold_invariants(
        actions in proptest::collection::vec(arb_action(), 0..25)
    ) {
        let mut state = CartState::default();
        for action in actions {
            state = reduce(&state, action);
            assert_invariants(&state)?;
        }
    }

    /// Adding an existing line again grows that line instead of duplicating it.
    #[test]
    fn prop_re_add_merges(item in arb_item(), extra in 1i64..5) {
        let state = reduce(&CartState::default(), CartAction::AddItem(item.clone()));
        let before = state.items.len();

        let mut again = item;
        again.quantity = extra;
        let key = again.key();
        let next = reduce(&state, CartAction::AddItem(again));

        prop_assert_eq!(next.items.len(), before);
        let line = next.get_item(&key).expect("line present");
        prop_assert_eq!(line.quantity, state.items[0].quantity + extra);
    }

    /// SetCart produces consistent state from arbitrary stored items.
    #[test]
    fn prop_set_cart_holds_invariants(items in proptest::collection::vec(arb_item(), 0..8)) {
        let state = reduce(&CartState::initial(), CartAction::SetCart(items));
        prop_assert!(!state.loading);
        assert_invariants(&state)?;
    }
}
