//! Background refresh of catalog data for items already in the cart.
//!
//! Fetches run in parallel and race a version change: any user edit while
//! they are in flight cancels them. Once they finish, the abort conditions
//! are checked again under the state write lock before anything is
//! applied, so a refresh never overwrites a cart that moved on.

use crate::{CartSession, CatalogError, MutationTracker, ProductCatalog};
use cart_commerce::cart::{reduce, CartAction, CartItem, CartState};
use cart_commerce::catalog::Product;
use cart_commerce::ProductId;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Whether a refresh is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Refreshing,
}

/// Why a refresh did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSkip {
    InProgress,
    Modifying,
    /// The cart is waiting for a load, so its items belong to no mode yet.
    Loading,
    EmptyCart,
}

/// Why fetched data was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// A mutation happened after the refresh started.
    VersionChanged,
    /// A removal grace window is open.
    Modifying,
    /// A load started, replacing the cart the snapshot came from.
    Loading,
    /// The cart is now empty.
    CartEmptied,
    /// The number of lines differs from the snapshot.
    LineCountChanged,
}

/// Result of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh data was applied. `failed` counts products that kept their
    /// previous snapshot.
    Applied { refreshed: usize, failed: usize },
    Skipped(RefreshSkip),
    Stale(StaleReason),
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

/// Re-fetches product records and applies them when still current.
pub struct RefreshController<C> {
    catalog: C,
    fetch_timeout: Duration,
    refreshing: AtomicBool,
}

struct RefreshingGuard<'a>(&'a AtomicBool);

impl Drop for RefreshingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<C: ProductCatalog> RefreshController<C> {
    /// Create a refresh controller.
    pub fn new(catalog: C, fetch_timeout: Duration) -> Self {
        Self {
            catalog,
            fetch_timeout,
            refreshing: AtomicBool::new(false),
        }
    }

    /// The catalog fetched from.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Current phase.
    pub fn phase(&self) -> RefreshPhase {
        if self.refreshing.load(Ordering::SeqCst) {
            RefreshPhase::Refreshing
        } else {
            RefreshPhase::Idle
        }
    }

    /// Refresh every distinct product in the cart.
    ///
    /// Only one refresh runs at a time; a second call returns
    /// [`RefreshSkip::InProgress`] immediately.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        session: &RwLock<CartSession>,
        tracker: &MutationTracker,
    ) -> RefreshOutcome {
        if self.refreshing.swap(true, Ordering::SeqCst) {
            debug!("refresh already running");
            return RefreshOutcome::Skipped(RefreshSkip::InProgress);
        }
        let _guard = RefreshingGuard(&self.refreshing);
        self.refresh(session, tracker).await
    }

    async fn refresh(
        &self,
        session: &RwLock<CartSession>,
        tracker: &MutationTracker,
    ) -> RefreshOutcome {
        if tracker.is_modifying() {
            debug!("cart is being modified, skipping refresh");
            return RefreshOutcome::Skipped(RefreshSkip::Modifying);
        }

        let mut version_rx = tracker.subscribe();
        let (snapshot, version_at_start) = {
            let session = session.read().await;
            if session.state.loading {
                debug!(mode = %session.mode, "cart is loading, skipping refresh");
                return RefreshOutcome::Skipped(RefreshSkip::Loading);
            }
            (session.state.items.clone(), *version_rx.borrow_and_update())
        };
        if snapshot.is_empty() {
            return RefreshOutcome::Skipped(RefreshSkip::EmptyCart);
        }

        let ids = distinct_product_ids(&snapshot);
        debug!(products = ids.len(), version_at_start, "refreshing cart products");

        let fetches = join_all(ids.iter().map(|&id| self.fetch_one(id)));
        let results = tokio::select! {
            results = fetches => results,
            _ = version_rx.changed() => {
                debug!(version_at_start, "cart changed mid-refresh, dropping fetches");
                return RefreshOutcome::Stale(StaleReason::VersionChanged);
            }
        };

        let mut fresh = HashMap::with_capacity(ids.len());
        let mut failed = 0;
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(product) => {
                    fresh.insert(id, product);
                }
                Err(e) => {
                    warn!(product_id = %id, error = %e, "product refresh failed, keeping snapshot");
                    failed += 1;
                }
            }
        }

        let mut live = session.write().await;
        if let Some(reason) = staleness(&live.state, tracker, version_at_start, snapshot.len()) {
            debug!(?reason, "discarding stale refresh");
            return RefreshOutcome::Stale(reason);
        }

        let items = snapshot
            .into_iter()
            .map(|item| match fresh.get(&item.product_id) {
                Some(product) => reattach(item, product),
                None => item,
            })
            .collect();
        live.state = reduce(&live.state, CartAction::SetCart(items));

        info!(refreshed = fresh.len(), failed, "applied product refresh");
        RefreshOutcome::Applied {
            refreshed: fresh.len(),
            failed,
        }
    }

    async fn fetch_one(&self, id: ProductId) -> Result<Product, CatalogError> {
        let fetch = tokio::time::timeout(self.fetch_timeout, self.catalog.fetch_product_by_id(id))
            .await
            .map_err(|_| CatalogError::Timeout(self.fetch_timeout))??;
        fetch.into_product().ok_or(CatalogError::NotFound(id))
    }
}

fn distinct_product_ids(items: &[CartItem]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.product_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn staleness(
    live: &CartState,
    tracker: &MutationTracker,
    version_at_start: u64,
    snapshot_lines: usize,
) -> Option<StaleReason> {
    if tracker.version() != version_at_start {
        Some(StaleReason::VersionChanged)
    } else if tracker.is_modifying() {
        Some(StaleReason::Modifying)
    } else if live.loading {
        Some(StaleReason::Loading)
    } else if live.is_empty() {
        Some(StaleReason::CartEmptied)
    } else if live.items.len() != snapshot_lines {
        Some(StaleReason::LineCountChanged)
    } else {
        None
    }
}

/// Attach a fresh product record, and its matching variant records, to an item.
fn reattach(mut item: CartItem, product: &Product) -> CartItem {
    if let Some(variant_id) = item.variant_id {
        if let Some(fresh) = product.variant(variant_id) {
            item.variant = Some(fresh.clone());
        }
    }
    if let Some(set) = item.variant_set.as_mut() {
        for variant in set.iter_mut() {
            if let Some(fresh) = product.variant(variant.id) {
                *variant = fresh.clone();
            }
        }
    }
    item.product_snapshot = Some(product.clone());
    item
}
