//! Identity mode and the state it scopes.

use cart_commerce::cart::CartState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which identity the cart belongs to.
///
/// Guest and signed-in carts are independent; switching replaces the cart
/// with the one stored for the new mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    #[default]
    Guest,
    Authenticated,
}

impl IdentityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityMode::Guest => "guest",
            IdentityMode::Authenticated => "authenticated",
        }
    }
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cart state together with the mode it was loaded for.
///
/// Kept under one lock so a mutation always saves to the key of the mode
/// its state belongs to.
#[derive(Debug, Clone, Default)]
pub struct CartSession {
    pub state: CartState,
    pub mode: IdentityMode,
}

impl CartSession {
    /// Session waiting for its first load.
    pub fn new(mode: IdentityMode) -> Self {
        Self {
            state: CartState::initial(),
            mode,
        }
    }

    /// Check if the state has been loaded for the current mode.
    pub fn is_hydrated(&self) -> bool {
        !self.state.loading
    }
}
