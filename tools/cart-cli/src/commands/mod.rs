//! CLI command implementations.

pub mod add;
pub mod clear;
pub mod refresh;
pub mod remove;
pub mod show;
pub mod update;

use cart_commerce::cart::ItemKey;
use cart_commerce::{ProductId, VariantId};
use clap::Args;

/// Arguments identifying a cart line.
#[derive(Args)]
pub struct LineArgs {
    /// Product id.
    pub product_id: ProductId,

    /// Selected variant id.
    #[arg(long)]
    pub variant: Option<VariantId>,

    /// Comma-separated ids of a multi-variant selection.
    #[arg(long, value_delimiter = ',')]
    pub variant_set: Vec<VariantId>,
}

impl LineArgs {
    /// Identity of the line these arguments name.
    pub fn key(&self) -> ItemKey {
        ItemKey::from_parts(self.product_id, self.variant, Some(self.variant_set.as_slice()))
    }
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub line: LineArgs,

    /// Quantity to add.
    #[arg(short, long, default_value = "1")]
    pub quantity: i64,

    /// Special instructions for this line.
    #[arg(long)]
    pub note: Option<String>,

    /// Unit price to fall back on when catalog data cannot price the line.
    #[arg(long)]
    pub unit_price: Option<f64>,

    /// Base price to snapshot instead of the catalog price.
    #[arg(long)]
    pub base_price: Option<f64>,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub line: LineArgs,

    /// New quantity; 0 removes the line.
    #[arg(allow_hyphen_values = true)]
    pub quantity: i64,
}
