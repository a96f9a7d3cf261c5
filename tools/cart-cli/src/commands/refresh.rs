//! Refresh product data for the cart.

use anyhow::Result;
use cart_sync::{RefreshOutcome, RefreshSkip};

use super::show;
use crate::context::Context;

/// Run the refresh command.
pub async fn run(ctx: &Context) -> Result<()> {
    match ctx.cart.refresh_cart_products().await {
        RefreshOutcome::Applied { refreshed, failed } => {
            ctx.output
                .success(&format!("Refreshed {} product(s)", refreshed));
            if failed > 0 {
                ctx.output
                    .warn(&format!("{} product(s) kept their previous data", failed));
            }
        }
        RefreshOutcome::Skipped(RefreshSkip::EmptyCart) => {
            ctx.output.info("Cart is empty, nothing to refresh.");
        }
        RefreshOutcome::Skipped(reason) => {
            ctx.output.info(&format!("Refresh skipped: {:?}", reason));
        }
        RefreshOutcome::Stale(reason) => {
            ctx.output
                .debug(&format!("Refresh discarded: {:?}", reason));
        }
    }

    show::print_cart(ctx, &ctx.cart.state().await);
    Ok(())
}
