//! Add a catalog product to the cart.

use anyhow::{Context as _, Result};
use cart_commerce::CommerceError;
use cart_sync::AddToCartOptions;

use super::{show, AddArgs};
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    if args.quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(args.quantity).into());
    }

    let product_id = args.line.product_id;
    let product = ctx
        .cart
        .refresher()
        .catalog()
        .get(product_id)
        .cloned()
        .with_context(|| format!("Product {} not found in catalog", product_id))?;

    let mut options = AddToCartOptions::default();
    if let Some(variant_id) = args.line.variant {
        let variant = product
            .variant(variant_id)
            .cloned()
            .with_context(|| format!("Product {} has no variant {}", product_id, variant_id))?;
        options = options.with_variant(variant);
    }
    if !args.line.variant_set.is_empty() {
        let variants = args
            .line
            .variant_set
            .iter()
            .map(|&id| {
                product
                    .variant(id)
                    .cloned()
                    .with_context(|| format!("Product {} has no variant {}", product_id, id))
            })
            .collect::<Result<Vec<_>>>()?;
        options = options.with_variant_set(variants);
    }
    if let Some(note) = args.note {
        options = options.with_instructions(note);
    }
    if let Some(price) = args.unit_price {
        options = options.with_unit_price(price);
    }
    if let Some(price) = args.base_price {
        options = options.with_base_price(price);
    }

    let name = product.name.clone();
    let state = ctx.cart.add_to_cart(product, args.quantity, options).await;

    ctx.output.success(&format!("Added {} x {}", args.quantity, name));
    show::print_cart(ctx, &state);
    Ok(())
}
