//! Monetary rounding.
//!
//! Every amount a calculator produces goes through [`round_money`]: two
//! decimal places, half-up.

use rust_decimal::{Decimal, RoundingStrategy};

/// The number of decimal places money amounts carry.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary value to the cent using round-half-up.
///
/// The result always carries exactly two decimal places, so `60` becomes `60.00`.
///
/// # Examples
///
/// ```
/// use duty_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("2.345").unwrap()).to_string(), "2.35");
/// assert_eq!(round_money(Decimal::from(60)).to_string(), "60.00");
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}

/// Applies a percentage rate to a value and rounds the result.
pub fn percentage_of(value: Decimal, percentage_rate: Decimal) -> Decimal {
    round_money(value * percentage_rate / Decimal::ONE_HUNDRED)
}
