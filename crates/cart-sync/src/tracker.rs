//! Mutation tracking for staleness checks.
//!
//! A monotonic version is bumped by every user edit and every load that
//! replaces the cart. Removals also arm a short "modifying" window during
//! which refreshes are refused.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Version counter plus the modifying grace window.
#[derive(Debug)]
pub struct MutationTracker {
    version: watch::Sender<u64>,
    modifying_until: watch::Sender<Option<Instant>>,
    grace: Duration,
}

impl MutationTracker {
    /// Create a tracker at version zero.
    pub fn new(grace: Duration) -> Self {
        let (version, _) = watch::channel(0);
        let (modifying_until, _) = watch::channel(None);
        Self {
            version,
            modifying_until,
            grace,
        }
    }

    /// Current version.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Receiver notified on every bump.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Advance the version, returning the new value.
    pub fn bump(&self) -> u64 {
        self.version.send_modify(|v| *v += 1);
        self.version()
    }

    /// Open the modifying window for the configured grace period.
    pub fn mark_modifying(&self) {
        self.modifying_until
            .send_replace(Some(Instant::now() + self.grace));
    }

    /// Check if the modifying window is still open.
    pub fn is_modifying(&self) -> bool {
        matches!(*self.modifying_until.borrow(), Some(until) if Instant::now() < until)
    }
}
