//! Set the quantity of a cart line.

use anyhow::{bail, Result};
use cart_commerce::CommerceError;

use super::{show, UpdateArgs};
use crate::context::Context;

/// Run the update command.
pub async fn run(args: UpdateArgs, ctx: &Context) -> Result<()> {
    if args.quantity < 0 {
        return Err(CommerceError::InvalidQuantity(args.quantity).into());
    }

    let key = args.line.key();
    if ctx.cart.get_cart_item(&key).await.is_none() {
        bail!("No line matches {}", key);
    }

    let state = ctx.cart.update_quantity(key.clone(), args.quantity).await;
    if args.quantity == 0 {
        ctx.output.success(&format!("Removed {}", key));
    } else {
        ctx.output
            .success(&format!("Set {} to {}", key, args.quantity));
    }
    show::print_cart(ctx, &state);
    Ok(())
}
