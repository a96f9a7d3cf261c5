//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use cart_store::FileStore;
use cart_sync::{CartController, IdentityMode, StaticCatalog};
use tracing::debug;

use crate::config::CliConfig;
use crate::output::Output;

/// Cart controller as the CLI runs it.
pub type Cart = CartController<FileStore, StaticCatalog>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Hydrated cart.
    pub cart: Cart,
}

impl Context {
    /// Load config, open the store and catalog, and hydrate the cart.
    pub async fn load(config_path: Option<&str>, auth: bool, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        let dir = &config.storage.dir;
        let store = FileStore::open(dir)
            .await
            .with_context(|| format!("Failed to open cart store: {}", dir.display()))?;
        let catalog = match &config.catalog.path {
            Some(path) => load_catalog(path)?,
            None => StaticCatalog::new(),
        };

        let mode = if auth {
            IdentityMode::Authenticated
        } else {
            IdentityMode::Guest
        };
        let cart = CartController::with_mode(store, catalog, config.cart.clone(), mode);
        if let Some(loaded) = cart.hydrate().await {
            debug!(
                mode = %mode,
                source = ?loaded.source,
                items = loaded.items.len(),
                "hydrated cart"
            );
        }

        Ok(Self {
            config,
            output,
            cart,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["cart.toml", ".cart.toml", "cart.json"];

        let mut current = PathBuf::from(start);
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }
}

fn load_catalog(path: &Path) -> Result<StaticCatalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    StaticCatalog::from_json(&raw)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))
}
