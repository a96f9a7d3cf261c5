//! Empty the cart.

use anyhow::Result;

use crate::context::Context;

/// Run the clear command.
pub async fn run(ctx: &Context) -> Result<()> {
    let before = ctx.cart.state().await.item_count;
    let state = ctx.cart.clear_cart().await;

    if ctx.output.is_json() {
        ctx.output.json(&state);
    } else {
        ctx.output
            .success(&format!("Cleared {} item(s)", before));
    }
    Ok(())
}
