use crate::model::{Amount, Totals};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Prices a cart subtotal: `tax = round_half_up(subtotal × tax_rate)`,
/// `total = subtotal + shipping + tax`.
pub fn quote(subtotal: Amount, shipping: Amount, tax_rate: Decimal) -> Totals {
    let tax = tax_on(subtotal, tax_rate);
    Totals {
        subtotal,
        shipping,
        tax,
        total: subtotal.saturating_add(shipping).saturating_add(tax),
    }
}

fn tax_on(subtotal: Amount, tax_rate: Decimal) -> Amount {
    Decimal::from(subtotal)
        .checked_mul(tax_rate)
        .map(|t| t.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|t| t.to_u64())
        .unwrap_or(Amount::MAX)
}
