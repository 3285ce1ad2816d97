//! Core money helpers shared by both fare schedules.
//!
//! Pure functions only - no I/O, no clock, no configuration lookups.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Round to specified decimal places using half-up rounding.
///
/// Values exactly halfway between two possibilities round away from zero,
/// which matches how fares are shown to riders.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use agts_fares::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(5.125), 2), dec!(5.13));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a fare figure to cents, always carrying two decimal places
/// so `68.9` is reported as `68.90`.
///
/// Amounts with more than 26 integer digits cannot carry two decimal places
/// and keep their original scale. Engine inputs are bounded well below that.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = round_money(amount, 2);
    rounded.rescale(2);
    rounded
}

/// Clamp negative inputs to zero.
///
/// Trip inputs arrive from a browser form and a third-party distance lookup;
/// a negative distance or duration is treated as "unknown" rather than
/// allowed to produce a negative fare.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Clamp a trip measurement into `0..=max`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use agts_fares::pricing::calculators::bounded;
///
/// assert_eq!(bounded(dec!(-2), dec!(10)), dec!(0));
/// assert_eq!(bounded(dec!(12), dec!(10)), dec!(10));
/// ```
pub fn bounded(value: Decimal, max: Decimal) -> Decimal {
    non_negative(value).min(max)
}

/// Format an amount as US dollars, e.g. `$1,234.56`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use agts_fares::pricing::format_usd;
///
/// assert_eq!(format_usd(dec!(1234.5)), "$1,234.50");
/// assert_eq!(format_usd(dec!(-3)), "-$3.00");
/// ```
pub fn format_usd(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let cents = (rounded.abs() * Decimal::ONE_HUNDRED).to_u128().unwrap_or(0);
    let dollars = (cents / 100).to_string();
    let fraction = cents % 100;

    // Group the integer part in thousands
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, fraction)
}
