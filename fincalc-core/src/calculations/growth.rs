//! Compound-growth projection with regular monthly deposits.
//!
//! Every point of the projection, including the yearly series, is evaluated
//! from the closed-form future-value expressions rather than by stepping
//! month by month, so the last yearly entry always equals the final value.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculations::GrowthProjector;
//! use fincalc_core::GrowthInputs;
//!
//! let inputs = GrowthInputs {
//!     initial: dec!(1000),
//!     monthly_contribution: dec!(0),
//!     annual_rate: dec!(0.12),
//!     years: 1,
//! };
//!
//! let result = GrowthProjector::project(&inputs).unwrap().rounded();
//!
//! assert_eq!(result.final_value, dec!(1126.83));
//! assert_eq!(result.yearly.len(), 2);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{compound_factor, monthly_rate, require_amount, require_rate};
use crate::error::CalcError;
use crate::models::{GrowthInputs, GrowthResult, Money, YearEntry};

/// Longest projection horizon, in years.
pub const MAX_YEARS: u32 = 100;

/// Stateless future-value calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthProjector;

impl GrowthProjector {
    /// Projects `inputs` forward, one entry per year from year 0.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] for negative amounts, a rate
    /// outside `[0, 1)`, more than 100 years, or a rate and horizon whose
    /// growth leaves the supported range.
    pub fn project(inputs: &GrowthInputs) -> Result<GrowthResult, CalcError> {
        require_amount("initial", inputs.initial)?;
        require_amount("monthly_contribution", inputs.monthly_contribution)?;
        require_rate("annual_rate", inputs.annual_rate)?;
        if inputs.years > MAX_YEARS {
            return Err(CalcError::invalid(
                "years",
                format!("must not exceed {MAX_YEARS}, got {}", inputs.years),
            ));
        }

        let yearly = (0..=inputs.years)
            .map(|year| Self::value_at(inputs, year))
            .collect::<Result<Vec<_>, _>>()?;

        let last = yearly[yearly.len() - 1];
        debug!(
            years = inputs.years,
            final_value = %last.total,
            "projected compound growth"
        );

        Ok(GrowthResult {
            final_value: last.total,
            total_contributed: last.contributed,
            total_interest: last.interest,
            yearly,
        })
    }

    /// Closed-form position after `year` whole years.
    fn value_at(
        inputs: &GrowthInputs,
        year: u32,
    ) -> Result<YearEntry, CalcError> {
        let months = year * 12;
        let periods = Decimal::from(months);
        let rate = monthly_rate(inputs.annual_rate);
        let factor = compound_factor("annual_rate", rate, months)?;

        let fv_initial = inputs.initial * factor;
        let fv_contributions: Money = if rate.is_zero() {
            inputs.monthly_contribution * periods
        } else {
            inputs.monthly_contribution * (factor - Decimal::ONE) / rate
        };

        let total = fv_initial + fv_contributions;
        let contributed = inputs.initial + inputs.monthly_contribution * periods;

        Ok(YearEntry {
            year,
            contributed,
            interest: total - contributed,
            total,
        })
    }
}
