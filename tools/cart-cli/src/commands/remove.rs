//! Remove a line from the cart.

use anyhow::Result;

use super::{show, LineArgs};
use crate::context::Context;

/// Run the remove command.
pub async fn run(args: LineArgs, ctx: &Context) -> Result<()> {
    let key = args.key();
    if ctx.cart.get_cart_item(&key).await.is_none() {
        ctx.output.warn(&format!("No line matches {}", key));
        return Ok(());
    }

    let state = ctx.cart.remove_from_cart(key.clone()).await;
    ctx.output.success(&format!("Removed {}", key));
    show::print_cart(ctx, &state);
    Ok(())
}
