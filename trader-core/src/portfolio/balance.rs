//! Balance normalisation for the decision authority

use crate::exchange::Balance;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Round to `decimals` places through a decimal representation, so the
/// result prints without binary noise. `None` for non-finite input.
pub fn round_decimals(value: f64, decimals: u32) -> Option<f64> {
    Decimal::from_f64(value)?.round_dp(decimals).to_f64()
}

/// Keep only the product's currencies and withhold `haircut` of what is
/// available.
///
/// Quote-currency figures are truncated to whole units, base-currency
/// figures rounded to 8 decimals.
pub fn normalize_balances(balances: &[Balance], base: &str, quote: &str, haircut: f64) -> Vec<Balance> {
    let keep = 1.0 - haircut.clamp(0.0, 1.0);
    balances
        .iter()
        .filter_map(|b| {
            let available = b.available * keep;
            if b.currency.eq_ignore_ascii_case(quote) {
                Some(Balance {
                    currency: b.currency.clone(),
                    amount: b.amount.trunc(),
                    available: available.trunc(),
                })
            } else if b.currency.eq_ignore_ascii_case(base) {
                Some(Balance {
                    currency: b.currency.clone(),
                    amount: round_decimals(b.amount, 8).unwrap_or(b.amount),
                    available: round_decimals(available, 8).unwrap_or(available),
                })
            } else {
                None
            }
        })
        .collect()
}
