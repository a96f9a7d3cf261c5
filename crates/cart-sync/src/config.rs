//! Cart engine configuration.

use crate::IdentityMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the cart controller.
///
/// Every field has a default, so an empty `[cart]` section is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storage key of the guest cart.
    #[serde(default = "default_guest_key")]
    pub guest_key: String,

    /// Storage key of the signed-in cart.
    #[serde(default = "default_auth_key")]
    pub auth_key: String,

    /// How long a remove or clear blocks refreshes, in milliseconds.
    #[serde(default = "default_modifying_grace_ms")]
    pub modifying_grace_ms: u64,

    /// Upper bound for a single product fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Read every saved record back and compare item counts.
    #[serde(default = "default_true")]
    pub verify_writes: bool,
}

fn default_guest_key() -> String {
    "cart:guest".to_string()
}

fn default_auth_key() -> String {
    "cart:user".to_string()
}

fn default_modifying_grace_ms() -> u64 {
    300
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            guest_key: default_guest_key(),
            auth_key: default_auth_key(),
            modifying_grace_ms: default_modifying_grace_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            verify_writes: true,
        }
    }
}

impl CartConfig {
    /// Storage key for an identity mode.
    pub fn key_for(&self, mode: IdentityMode) -> &str {
        match mode {
            IdentityMode::Guest => &self.guest_key,
            IdentityMode::Authenticated => &self.auth_key,
        }
    }

    /// Grace window armed by removals.
    pub fn modifying_grace(&self) -> Duration {
        Duration::from_millis(self.modifying_grace_ms)
    }

    /// Per-product fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
