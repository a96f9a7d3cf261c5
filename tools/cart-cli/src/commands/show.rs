//! Show the cart.

use anyhow::Result;
use cart_commerce::cart::{CartPricing, CartState, PersistedCartRecord, RecordFormat};
use cart_sync::IdentityMode;
use chrono::{DateTime, Utc};

use crate::context::Context;
use crate::output::format_amount;

/// Run the show command.
pub async fn run(ctx: &Context) -> Result<()> {
    let state = ctx.cart.state().await;
    let mode = ctx.cart.mode().await;

    if !ctx.output.is_json() {
        ctx.output.header(&format!("Cart ({})", mode));
        if let Some(saved) = saved_at(ctx, mode).await {
            ctx.output
                .kv("Saved", &saved.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        }
    }

    print_cart(ctx, &state);
    Ok(())
}

/// Print the cart lines and totals.
pub fn print_cart(ctx: &Context, state: &CartState) {
    let pricing = CartPricing::from_state(state);
    if ctx.output.is_json() {
        ctx.output.json(&pricing);
        return;
    }

    if state.is_empty() {
        ctx.output.info("Cart is empty.");
        return;
    }

    let widths = [24, 28, 10, 5, 10];
    ctx.output
        .table_row(&["LINE", "NAME", "UNIT", "QTY", "SUBTOTAL"], &widths);
    for line in &pricing.line_items {
        ctx.output.table_row(
            &[
                &line.key.to_string(),
                &line.name,
                &format_amount(line.unit_price),
                &line.quantity.to_string(),
                &format_amount(line.subtotal),
            ],
            &widths,
        );
    }
    ctx.output.kv("Items", &pricing.item_count.to_string());
    ctx.output.kv("Total", &format_amount(state.total_amount));
}

/// When the stored cart for `mode` was last saved.
async fn saved_at(ctx: &Context, mode: IdentityMode) -> Option<DateTime<Utc>> {
    let key = ctx.config.cart.key_for(mode);
    let raw = ctx.cart.persistence().store().get(key).await.ok()??;
    match PersistedCartRecord::parse(&raw).ok()? {
        (record, RecordFormat::Envelope) => DateTime::from_timestamp_millis(record.timestamp),
        (_, RecordFormat::Legacy) => None,
    }
}
