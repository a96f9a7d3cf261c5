//! Loading and saving the cart against keyed storage.
//!
//! Storage I/O is serialized by one async mutex. A load waits for it, so a
//! load never observes a half-finished save. A save only tries it and is
//! skipped when another operation holds it; the next state change saves
//! again. The save that immediately follows a load is skipped as well,
//! since it would rewrite the record just read.

use crate::{CartConfig, IdentityMode, SyncError};
use cart_commerce::cart::{CartItem, PersistedCartRecord, RecordFormat};
use cart_store::{KeyValueStore, Store};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{watch, Mutex};
use tracing::{debug, instrument, warn};

/// What the persistence controller is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistencePhase {
    #[default]
    Idle,
    Loading,
    Saving,
}

/// Where loaded items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing stored under the key.
    Missing,
    /// `{ items, timestamp }` record.
    Envelope,
    /// Bare item array.
    Legacy,
    /// Storage failed or held something that is not a cart.
    Unreadable,
}

/// Result of a load. Failures yield an empty item list.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub mode: IdentityMode,
    pub items: Vec<CartItem>,
    pub source: LoadSource,
}

/// Why a save did not write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveSkip {
    /// Another load or save holds storage.
    InFlight,
    /// This save directly follows a load.
    JustLoaded,
}

/// Result of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { items: usize },
    Skipped(SaveSkip),
    Failed,
}

/// Serializes cart loads and saves for one storage backend.
pub struct PersistenceController<S> {
    store: Store<S>,
    config: CartConfig,
    io: Mutex<()>,
    just_loaded: AtomicBool,
    phase: watch::Sender<PersistencePhase>,
}

impl<S: KeyValueStore> PersistenceController<S> {
    /// Create a controller over a storage backend.
    pub fn new(backend: S, config: CartConfig) -> Self {
        let (phase, _) = watch::channel(PersistencePhase::Idle);
        Self {
            store: Store::new(backend),
            config,
            io: Mutex::new(()),
            just_loaded: AtomicBool::new(false),
            phase,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> PersistencePhase {
        *self.phase.borrow()
    }

    /// Underlying store.
    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Load the cart stored for `mode`.
    ///
    /// Waits for an in-flight save first. Never fails: storage and parse
    /// errors are logged and produce an empty cart.
    #[instrument(skip(self))]
    pub async fn load(&self, mode: IdentityMode) -> LoadOutcome {
        let _guard = self.io.lock().await;
        self.phase.send_replace(PersistencePhase::Loading);

        let key = self.config.key_for(mode);
        let (items, source) = match self.read_record(key).await {
            Ok(None) => (Vec::new(), LoadSource::Missing),
            Ok(Some((record, RecordFormat::Envelope))) => (record.items, LoadSource::Envelope),
            Ok(Some((record, RecordFormat::Legacy))) => (record.items, LoadSource::Legacy),
            Err(e) => {
                warn!(key, error = %e, "failed to load stored cart, starting empty");
                (Vec::new(), LoadSource::Unreadable)
            }
        };

        self.just_loaded.store(true, Ordering::SeqCst);
        self.phase.send_replace(PersistencePhase::Idle);
        debug!(key, items = items.len(), source = ?source, "loaded cart");

        LoadOutcome {
            mode,
            items,
            source,
        }
    }

    /// Save `items` as the cart for `mode`.
    ///
    /// Skipped when storage is busy or when this is the first save after a
    /// load. Never fails: write errors are logged and reported as
    /// [`SaveOutcome::Failed`].
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn save(&self, mode: IdentityMode, items: &[CartItem]) -> SaveOutcome {
        let Ok(_guard) = self.io.try_lock() else {
            debug!("storage busy, skipping save");
            return SaveOutcome::Skipped(SaveSkip::InFlight);
        };
        if self.just_loaded.swap(false, Ordering::SeqCst) {
            debug!("skipping save right after load");
            return SaveOutcome::Skipped(SaveSkip::JustLoaded);
        }

        self.phase.send_replace(PersistencePhase::Saving);
        let key = self.config.key_for(mode);
        let record = PersistedCartRecord::new(items.to_vec());
        let outcome = match self.write_record(key, &record).await {
            Ok(()) => SaveOutcome::Saved {
                items: record.items.len(),
            },
            Err(e) => {
                warn!(key, error = %e, "failed to save cart");
                SaveOutcome::Failed
            }
        };
        self.phase.send_replace(PersistencePhase::Idle);
        outcome
    }

    /// Forget that a load just happened, so the next save writes.
    ///
    /// Used when a loaded cart is discarded instead of applied.
    pub fn acknowledge_load(&self) {
        self.just_loaded.store(false, Ordering::SeqCst);
    }

    /// Delete the record stored for `mode`. Returns false if storage failed.
    #[instrument(skip(self))]
    pub async fn purge(&self, mode: IdentityMode) -> bool {
        let _guard = self.io.lock().await;
        let key = self.config.key_for(mode);
        match self.store.delete(key).await {
            Ok(()) => {
                debug!(key, "purged stored cart");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "failed to purge stored cart");
                false
            }
        }
    }

    async fn read_record(
        &self,
        key: &str,
    ) -> Result<Option<(PersistedCartRecord, RecordFormat)>, SyncError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(PersistedCartRecord::parse(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write_record(&self, key: &str, record: &PersistedCartRecord) -> Result<(), SyncError> {
        self.store.set(key, &record.to_json()?).await?;

        if self.config.verify_writes {
            match self.read_record(key).await? {
                Some((stored, _)) if stored.items.len() == record.items.len() => {}
                Some((stored, _)) => warn!(
                    key,
                    expected = record.items.len(),
                    actual = stored.items.len(),
                    "stored cart does not match the saved cart"
                ),
                None => warn!(key, "stored cart missing right after save"),
            }
        }
        Ok(())
    }
}
