//! Common helpers shared by the calculation engines.
//!
//! Rounding for display, input-domain checks and the checked compound factor
//! live here so every engine rejects bad input the same way.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::CalcError;
use crate::models::{Money, Ratio};

/// Largest money amount any engine accepts.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Largest `(1 + r)^n` the engines will work with.
pub const MAX_COMPOUND_FACTOR: Decimal = dec!(1000000000000);

/// Longest loan term, in months.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Months per year; every engine compounds monthly.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a ratio to four decimal places (hundredths of a percent).
pub fn round_ratio(value: Ratio) -> Ratio {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Clamps `value` into `[low, high]`. `low` wins if the bounds cross.
pub fn clamp(
    value: Decimal,
    low: Decimal,
    high: Decimal,
) -> Decimal {
    max(min(value, high), low)
}

/// Rejects amounts that are negative or beyond [`MAX_AMOUNT`].
pub(crate) fn require_amount(
    field: &'static str,
    value: Money,
) -> Result<(), CalcError> {
    if value < Decimal::ZERO {
        return Err(CalcError::invalid(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(CalcError::invalid(
            field,
            format!("must not exceed {MAX_AMOUNT}, got {value}"),
        ));
    }
    Ok(())
}

/// Rejects annual rates outside `[0, 1)`.
pub(crate) fn require_rate(
    field: &'static str,
    value: Ratio,
) -> Result<(), CalcError> {
    if value < Decimal::ZERO || value >= Decimal::ONE {
        return Err(CalcError::invalid(
            field,
            format!("must lie in [0, 1), got {value}"),
        ));
    }
    Ok(())
}

/// Nominal annual rate to the equivalent monthly rate.
pub(crate) fn monthly_rate(annual_rate: Ratio) -> Ratio {
    annual_rate / MONTHS_PER_YEAR
}

/// `(1 + rate)^periods`, by squaring, with every step checked.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] against `field` when the factor would
/// exceed [`MAX_COMPOUND_FACTOR`].
pub(crate) fn compound_factor(
    field: &'static str,
    rate: Ratio,
    periods: u32,
) -> Result<Decimal, CalcError> {
    checked_growth(rate, periods).ok_or_else(|| {
        CalcError::invalid(
            field,
            format!("rate {rate} over {periods} periods grows beyond the supported range"),
        )
    })
}

/// `1 - (1 + rate)^-periods`: the share of a level payment stream that is
/// present value rather than discount.
///
/// Past [`MAX_COMPOUND_FACTOR`] the discounted tail is below one part in
/// 10^12 and the result is taken as exactly one, so long high-rate terms
/// converge on the interest-only payment instead of failing.
pub(crate) fn annuity_discount(
    rate: Ratio,
    periods: u32,
) -> Decimal {
    match checked_growth(rate, periods) {
        Some(factor) => (factor - Decimal::ONE) / factor,
        None => Decimal::ONE,
    }
}

fn checked_growth(
    rate: Ratio,
    periods: u32,
) -> Option<Decimal> {
    let mut base = Decimal::ONE + rate;
    let mut exponent = periods;
    let mut result = Decimal::ONE;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.checked_mul(base)?;
            if result > MAX_COMPOUND_FACTOR {
                return None;
            }
        }
        exponent >>= 1;
        if exponent > 0 {
            base = base.checked_mul(base)?;
        }
    }

    Some(result)
}
