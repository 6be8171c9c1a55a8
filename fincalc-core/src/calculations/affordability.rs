//! Maximum-mortgage evaluation under gross- and total-debt-service limits.
//!
//! The affordable payment is the tighter of the two debt-service ceilings
//! less recurring housing costs. The mortgage that payment supports is sized
//! at the qualifying (stress-tested) rate, then the payment and ratios are
//! re-derived at the contract rate for display.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::AffordabilityInputs;
//! use fincalc_core::calculations::AffordabilityEvaluator;
//!
//! let inputs = AffordabilityInputs {
//!     annual_income: dec!(80000),
//!     monthly_debts: dec!(0),
//!     down_payment: dec!(50000),
//!     contract_rate: dec!(0.05),
//!     amortization_years: 25,
//!     monthly_housing_expenses: dec!(150),
//! };
//!
//! let result = AffordabilityEvaluator::default().evaluate(&inputs).unwrap().rounded();
//!
//! assert_eq!(result.max_monthly_payment, dec!(2450.00));
//! assert_eq!(result.qualifying_rate, dec!(0.07));
//! assert_eq!(result.max_purchase_price, result.max_mortgage + dec!(50000));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::AmortizationEngine;
use crate::calculations::common::{MONTHS_PER_YEAR, max, min, require_amount, require_rate};
use crate::error::CalcError;
use crate::models::{AffordabilityInputs, AffordabilityResult, LendingRules, LoanTerms, Ratio};

/// Longest amortization period accepted, in years.
pub const MAX_AMORTIZATION_YEARS: u32 = 40;

/// Sizes the largest mortgage a household qualifies for.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffordabilityEvaluator {
    rules: LendingRules,
}

impl AffordabilityEvaluator {
    /// Evaluator using `rules`, normally taken from a year's rate table.
    pub fn with_rules(rules: LendingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &LendingRules {
        &self.rules
    }

    /// Evaluates `inputs`.
    ///
    /// When existing obligations alone already exceed a ceiling, the
    /// affordable payment and mortgage are zero and the reported ratios show
    /// those obligations.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] for negative amounts, a contract
    /// rate outside `[0, 1)`, a qualifying rate of 100% or more, or an
    /// amortization period outside 1 to 40 years.
    pub fn evaluate(
        &self,
        inputs: &AffordabilityInputs,
    ) -> Result<AffordabilityResult, CalcError> {
        require_amount("annual_income", inputs.annual_income)?;
        require_amount("monthly_debts", inputs.monthly_debts)?;
        require_amount("down_payment", inputs.down_payment)?;
        require_amount("monthly_housing_expenses", inputs.monthly_housing_expenses)?;
        require_rate("contract_rate", inputs.contract_rate)?;
        if inputs.amortization_years == 0 || inputs.amortization_years > MAX_AMORTIZATION_YEARS {
            return Err(CalcError::invalid(
                "amortization_years",
                format!(
                    "must lie in 1..={MAX_AMORTIZATION_YEARS}, got {}",
                    inputs.amortization_years
                ),
            ));
        }
        let qualifying_rate = inputs.contract_rate + self.rules.stress_add_on;
        require_rate("contract_rate", qualifying_rate)?;

        let monthly_income = inputs.annual_income / MONTHS_PER_YEAR;
        let gds_limit = monthly_income * self.rules.gds_limit;
        let tds_limit = max(
            monthly_income * self.rules.tds_limit - inputs.monthly_debts,
            Decimal::ZERO,
        );
        let max_monthly_payment = max(
            min(gds_limit, tds_limit) - inputs.monthly_housing_expenses,
            Decimal::ZERO,
        );
        if max_monthly_payment.is_zero() {
            warn!(
                %monthly_income,
                debts = %inputs.monthly_debts,
                housing = %inputs.monthly_housing_expenses,
                "existing obligations leave no room for a mortgage payment"
            );
        }

        let term_months = inputs.amortization_years * 12;
        let max_mortgage =
            AmortizationEngine::solve_for_principal(max_monthly_payment, qualifying_rate, term_months)?;
        let contract_payment = AmortizationEngine::compute_payment(&LoanTerms::new(
            max_mortgage,
            inputs.contract_rate,
            term_months,
        ))?
        .monthly_payment;

        let housing_cost = contract_payment + inputs.monthly_housing_expenses;
        let gds_ratio = ratio(housing_cost, monthly_income);
        let tds_ratio = ratio(housing_cost + inputs.monthly_debts, monthly_income);

        debug!(
            %max_monthly_payment,
            %max_mortgage,
            %gds_ratio,
            %tds_ratio,
            "evaluated affordability"
        );

        Ok(AffordabilityResult {
            gds_limit,
            tds_limit,
            max_monthly_payment,
            max_mortgage,
            max_purchase_price: max_mortgage + inputs.down_payment,
            qualifying_rate,
            contract_payment,
            gds_ratio,
            tds_ratio,
        })
    }
}

fn ratio(
    cost: Decimal,
    monthly_income: Decimal,
) -> Ratio {
    if monthly_income.is_zero() {
        Decimal::ZERO
    } else {
        cost / monthly_income
    }
}
