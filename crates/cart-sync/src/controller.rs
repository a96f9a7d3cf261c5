//! The cart controller screens talk to.
//!
//! Owns the cart state, the identity mode, and the three collaborators that
//! keep it in sync: persistence, mutation tracking and catalog refresh.
//! Every mutation reduces under the state write lock, bumps the mutation
//! version, then saves. Nothing here returns an error.

use crate::{
    CartConfig, CartSession, IdentityMode, LoadOutcome, MutationTracker, PersistenceController,
    ProductCatalog, RefreshController, RefreshOutcome,
};
use cart_commerce::cart::{reduce, CartAction, CartItem, CartState, ItemKey};
use cart_commerce::catalog::{Product, VariantRef};
use cart_store::KeyValueStore;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Optional selections for [`CartController::add_to_cart`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddToCartOptions {
    /// Single selected variant.
    pub variant: Option<VariantRef>,
    /// Simultaneously selected variants.
    pub variant_set: Option<Vec<VariantRef>>,
    /// Customer note.
    pub special_instructions: Option<String>,
    /// Unit price the screen already computed. Seeds the cached price,
    /// which only wins when the catalog data cannot price the item.
    pub unit_price_override: Option<f64>,
    /// Base price to snapshot instead of deriving it from the product.
    pub base_unit_price: Option<f64>,
}

impl AddToCartOptions {
    pub fn with_variant(mut self, variant: VariantRef) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_variant_set(mut self, variants: Vec<VariantRef>) -> Self {
        self.variant_set = Some(variants);
        self
    }

    pub fn with_instructions(mut self, note: impl Into<String>) -> Self {
        self.special_instructions = Some(note.into());
        self
    }

    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price_override = Some(price);
        self
    }

    pub fn with_base_price(mut self, price: f64) -> Self {
        self.base_unit_price = Some(price);
        self
    }
}

/// Authoritative cart for one device.
pub struct CartController<S, C> {
    session: RwLock<CartSession>,
    tracker: MutationTracker,
    persistence: PersistenceController<S>,
    refresh: RefreshController<C>,
}

impl<S: KeyValueStore, C: ProductCatalog> CartController<S, C> {
    /// Create a controller in guest mode. Call [`hydrate`](Self::hydrate)
    /// before use.
    pub fn new(store: S, catalog: C, config: CartConfig) -> Self {
        Self::with_mode(store, catalog, config, IdentityMode::Guest)
    }

    /// Create a controller starting in `mode`.
    pub fn with_mode(store: S, catalog: C, config: CartConfig, mode: IdentityMode) -> Self {
        Self {
            session: RwLock::new(CartSession::new(mode)),
            tracker: MutationTracker::new(config.modifying_grace()),
            refresh: RefreshController::new(catalog, config.fetch_timeout()),
            persistence: PersistenceController::new(store, config),
        }
    }

    /// Initial load for the current mode.
    ///
    /// Returns `None` if the mode changed while loading and the result was
    /// discarded.
    pub async fn hydrate(&self) -> Option<LoadOutcome> {
        let mode = self.session.read().await.mode;
        self.load_into(mode).await
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> CartState {
        self.session.read().await.state.clone()
    }

    /// Current identity mode.
    pub async fn mode(&self) -> IdentityMode {
        self.session.read().await.mode
    }

    /// The line matching `key`, if any.
    pub async fn get_cart_item(&self, key: &ItemKey) -> Option<CartItem> {
        self.session.read().await.state.get_item(key).cloned()
    }

    pub fn persistence(&self) -> &PersistenceController<S> {
        &self.persistence
    }

    pub fn refresher(&self) -> &RefreshController<C> {
        &self.refresh
    }

    pub fn tracker(&self) -> &MutationTracker {
        &self.tracker
    }

    /// Add `quantity` of a product, merging with an existing line.
    #[instrument(skip(self, product, options), fields(product_id = %product.id))]
    pub async fn add_to_cart(
        &self,
        product: Product,
        quantity: i64,
        options: AddToCartOptions,
    ) -> CartState {
        let mut item = CartItem::from_product(product, quantity);
        if let Some(variant) = options.variant {
            item = item.with_variant(variant);
        }
        if let Some(variants) = options.variant_set {
            item = item.with_variant_set(variants);
        }
        item.special_instructions = options.special_instructions;
        item.unit_price = options.unit_price_override.filter(|p| p.is_finite());
        item.base_unit_price_snapshot = options.base_unit_price.filter(|p| p.is_finite());

        self.dispatch(CartAction::AddItem(item)).await
    }

    /// Remove every line matching `key`.
    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn remove_from_cart(&self, key: ItemKey) -> CartState {
        self.dispatch(CartAction::RemoveItem(key)).await
    }

    /// Set the quantity of the line matching `key`; zero or less removes it.
    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn update_quantity(&self, key: ItemKey, quantity: i64) -> CartState {
        self.dispatch(CartAction::UpdateQuantity { key, quantity }).await
    }

    /// Empty the cart and save the empty cart.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> CartState {
        self.dispatch(CartAction::ClearCart).await
    }

    /// Switch to the guest cart. Returns false if already in guest mode.
    pub async fn switch_to_guest_mode(&self) -> bool {
        self.switch_mode(IdentityMode::Guest).await
    }

    /// Switch to the signed-in cart. Returns false if already signed in.
    pub async fn switch_to_auth_mode(&self) -> bool {
        self.switch_mode(IdentityMode::Authenticated).await
    }

    /// Re-fetch catalog data for the cart and save it if applied.
    pub async fn refresh_cart_products(&self) -> RefreshOutcome {
        let outcome = self.refresh.run(&self.session, &self.tracker).await;
        if outcome.is_applied() {
            let (items, mode) = {
                let session = self.session.read().await;
                (session.state.items.clone(), session.mode)
            };
            self.persistence.save(mode, &items).await;
        }
        outcome
    }

    async fn dispatch(&self, action: CartAction) -> CartState {
        let name = action.name();
        let removes = match &action {
            CartAction::RemoveItem(_) | CartAction::ClearCart => true,
            CartAction::UpdateQuantity { quantity, .. } => *quantity <= 0,
            _ => false,
        };

        let (state, mode, hydrated, version) = {
            let mut session = self.session.write().await;
            let hydrated = session.is_hydrated();
            session.state = reduce(&session.state, action);
            if removes {
                self.tracker.mark_modifying();
            }
            let version = self.tracker.bump();
            (session.state.clone(), session.mode, hydrated, version)
        };

        debug!(
            action = name,
            version,
            items = state.items.len(),
            total = state.total_amount,
            "cart updated"
        );
        if hydrated {
            self.persistence.save(mode, &state.items).await;
        }
        state
    }

    #[instrument(skip(self))]
    async fn switch_mode(&self, mode: IdentityMode) -> bool {
        {
            let mut session = self.session.write().await;
            if session.mode == mode {
                debug!("already in requested mode");
                return false;
            }
            session.mode = mode;
            session.state = reduce(&session.state, CartAction::SetLoading(true));
            self.tracker.bump();
        }
        info!("switched identity mode");
        self.load_into(mode).await;
        true
    }

    async fn load_into(&self, mode: IdentityMode) -> Option<LoadOutcome> {
        let outcome = self.persistence.load(mode).await;

        let mut session = self.session.write().await;
        if session.mode != mode {
            debug!(loaded = %mode, current = %session.mode, "discarding load for previous mode");
            self.persistence.acknowledge_load();
            return None;
        }
        session.state = reduce(&session.state, CartAction::SetCart(outcome.items.clone()));
        self.tracker.bump();

        let saved = self.persistence.save(mode, &session.state.items).await;
        debug!(?saved, items = session.state.items.len(), "applied loaded cart");
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LoadSource, StaticCatalog};
    use cart_commerce::cart::PersistedCartRecord;
    use cart_commerce::{ProductId, VariantId};
    use cart_store::MemoryStore;
    use std::sync::Arc;

    type TestController = CartController<Arc<MemoryStore>, StaticCatalog>;

    fn controller() -> (Arc<MemoryStore>, TestController) {
        let store = Arc::new(MemoryStore::new());
        let controller =
            CartController::new(Arc::clone(&store), StaticCatalog::new(), CartConfig::default());
        (store, controller)
    }

    fn coffee() -> Product {
        Product::new(ProductId::new(1), "Coffee", 4.0)
    }

    async fn stored(store: &MemoryStore, key: &str) -> Option<PersistedCartRecord> {
        let raw = store.get(key).await.unwrap()?;
        Some(PersistedCartRecord::parse(&raw).unwrap().0)
    }

    #[tokio::test]
    async fn test_hydrate_then_add_persists() {
        let (store, controller) = controller();
        assert!(controller.state().await.loading);

        let loaded = controller.hydrate().await.unwrap();
        assert_eq!(loaded.source, LoadSource::Missing);
        assert!(!controller.state().await.loading);

        let state = controller
            .add_to_cart(coffee(), 2, AddToCartOptions::default())
            .await;
        assert_eq!(state.item_count, 2);
        assert!((state.total_amount - 8.0).abs() < 1e-9);

        let record = stored(&store, "cart:guest").await.unwrap();
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_mutation_before_hydrate_is_not_saved() {
        let (store, controller) = controller();
        controller
            .add_to_cart(coffee(), 1, AddToCartOptions::default())
            .await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_with_options() {
        let (_, controller) = controller();
        controller.hydrate().await;

        let options = AddToCartOptions::default()
            .with_variant(VariantRef::additive(VariantId::new(5), 1.5))
            .with_instructions("oat milk")
            .with_base_price(3.0);
        controller.add_to_cart(coffee(), 1, options).await;

        let key = ItemKey::product(ProductId::new(1)).with_variant(VariantId::new(5));
        let item = controller.get_cart_item(&key).await.unwrap();
        assert_eq!(item.special_instructions.as_deref(), Some("oat milk"));
        assert_eq!(item.unit_price, Some(4.5));
    }

    #[tokio::test]
    async fn test_unit_price_used_when_catalog_cannot_price() {
        let (_, controller) = controller();
        controller.hydrate().await;

        let gift_card = Product::new(ProductId::new(3), "Gift card", 0.0);
        let options = AddToCartOptions::default().with_unit_price(25.0);
        let state = controller.add_to_cart(gift_card, 2, options).await;

        assert_eq!(state.items[0].unit_price, Some(25.0));
        assert!((state.total_amount - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let (store, controller) = controller();
        controller.hydrate().await;
        controller
            .add_to_cart(coffee(), 1, AddToCartOptions::default())
            .await;

        let key = ItemKey::product(ProductId::new(1));
        let state = controller.update_quantity(key.clone(), 5).await;
        assert_eq!(state.item_count, 5);

        let state = controller.update_quantity(key.clone(), 0).await;
        assert!(state.is_empty());
        assert!(controller.tracker().is_modifying());
        assert!(controller.get_cart_item(&key).await.is_none());

        let record = stored(&store, "cart:guest").await.unwrap();
        assert!(record.items.is_empty());
    }

    #[tokio::test]
    async fn test_mutations_bump_version() {
        let (_, controller) = controller();
        controller.hydrate().await;
        let before = controller.tracker().version();

        controller
            .add_to_cart(coffee(), 1, AddToCartOptions::default())
            .await;
        controller.clear_cart().await;
        assert_eq!(controller.tracker().version(), before + 2);
    }

    #[tokio::test]
    async fn test_switch_modes_keeps_carts_apart() {
        let (store, controller) = controller();
        controller.hydrate().await;
        controller
            .add_to_cart(coffee(), 1, AddToCartOptions::default())
            .await;

        assert!(controller.switch_to_auth_mode().await);
        assert!(!controller.switch_to_auth_mode().await);
        assert_eq!(controller.mode().await, IdentityMode::Authenticated);
        assert!(controller.state().await.is_empty());

        let bagel = Product::new(ProductId::new(2), "Bagel", 3.0);
        controller
            .add_to_cart(bagel, 3, AddToCartOptions::default())
            .await;

        assert!(controller.switch_to_guest_mode().await);
        let state = controller.state().await;
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].product_id, ProductId::new(1));

        let auth = stored(&store, "cart:user").await.unwrap();
        assert_eq!(auth.items[0].quantity, 3);
    }
}
