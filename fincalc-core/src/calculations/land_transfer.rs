//! Land-transfer duty on a property purchase.
//!
//! The duty schedule has the same shape as an income-tax schedule, so it is
//! evaluated with [`BracketEngine`].

use tracing::debug;

use crate::calculations::BracketEngine;
use crate::calculations::common::require_amount;
use crate::error::CalcError;
use crate::models::{BracketSet, Money};

/// Duty owed on a purchase at `price` under `brackets`.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] if `price` is negative.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::{Bracket, BracketSet};
/// use fincalc_core::calculations::land_transfer_tax;
///
/// let brackets = BracketSet::new(
///     "land_transfer",
///     vec![
///         Bracket::new(dec!(0), Some(dec!(61500)), dec!(0.005)),
///         Bracket::new(dec!(61500), Some(dec!(307800)), dec!(0.01)),
///         Bracket::new(dec!(307800), None, dec!(0.015)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(land_transfer_tax(dec!(400000), &brackets).unwrap(), dec!(4153.50));
/// ```
pub fn land_transfer_tax(
    price: Money,
    brackets: &BracketSet,
) -> Result<Money, CalcError> {
    require_amount("price", price)?;

    let duty = BracketEngine::new(brackets).evaluate(price);
    debug!(%price, %duty, schedule = brackets.name(), "computed land transfer duty");
    Ok(duty)
}
