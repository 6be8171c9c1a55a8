//! Fixed-payment loan math: payment size, full schedule, and the inverse
//! problem of sizing a loan from an affordable payment.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculations::AmortizationEngine;
//! use fincalc_core::LoanTerms;
//!
//! let terms = LoanTerms::new(dec!(12000), dec!(0.12), 12);
//! let result = AmortizationEngine::compute_payment(&terms).unwrap().rounded();
//!
//! assert_eq!(result.monthly_payment, dec!(1066.19));
//! assert_eq!(result.total_interest, dec!(794.23));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{
    MAX_TERM_MONTHS, annuity_discount, monthly_rate, require_amount, require_rate,
};
use crate::error::CalcError;
use crate::models::{AmortizationResult, LoanTerms, Money, Ratio, ScheduleEntry};

/// Stateless annuity calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationEngine;

impl AmortizationEngine {
    /// Monthly payment, total paid and total interest for `terms`.
    ///
    /// A zero rate falls back to straight-line repayment.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] if the principal is negative, the
    /// rate lies outside `[0, 1)`, or the term is zero or longer than 100 years.
    pub fn compute_payment(terms: &LoanTerms) -> Result<AmortizationResult, CalcError> {
        let monthly_payment = Self::payment(terms)?;
        Ok(Self::summarize(terms, monthly_payment, None))
    }

    /// Same as [`compute_payment`](Self::compute_payment) with the
    /// month-by-month schedule attached.
    pub fn schedule(terms: &LoanTerms) -> Result<AmortizationResult, CalcError> {
        let monthly_payment = Self::payment(terms)?;
        let rate = monthly_rate(terms.annual_rate);

        let mut balance = terms.principal;
        let entries = (1..=terms.term_months)
            .map(|period| {
                let interest_portion = balance * rate;
                let principal_portion = monthly_payment - interest_portion;
                balance -= principal_portion;
                ScheduleEntry {
                    period,
                    interest_portion,
                    principal_portion,
                    remaining_balance: balance,
                }
            })
            .collect();

        Ok(Self::summarize(terms, monthly_payment, Some(entries)))
    }

    /// Largest principal that `payment` repays over `term_months` at
    /// `annual_rate`; the inverse of the annuity formula.
    ///
    /// # Errors
    ///
    /// Same domain checks as [`compute_payment`](Self::compute_payment), with
    /// `payment` in place of the principal.
    pub fn solve_for_principal(
        payment: Money,
        annual_rate: Ratio,
        term_months: u32,
    ) -> Result<Money, CalcError> {
        require_amount("payment", payment)?;
        require_rate("annual_rate", annual_rate)?;
        require_term(term_months)?;

        let rate = monthly_rate(annual_rate);
        let periods = Decimal::from(term_months);
        if rate.is_zero() {
            return Ok(payment * periods);
        }

        Ok(payment * annuity_discount(rate, term_months) / rate)
    }

    fn payment(terms: &LoanTerms) -> Result<Money, CalcError> {
        require_amount("principal", terms.principal)?;
        require_rate("annual_rate", terms.annual_rate)?;
        require_term(terms.term_months)?;

        let rate = monthly_rate(terms.annual_rate);
        let periods = Decimal::from(terms.term_months);
        if rate.is_zero() {
            return Ok(terms.principal / periods);
        }

        Ok(terms.principal * rate / annuity_discount(rate, terms.term_months))
    }

    fn summarize(
        terms: &LoanTerms,
        monthly_payment: Money,
        schedule: Option<Vec<ScheduleEntry>>,
    ) -> AmortizationResult {
        let total_paid = monthly_payment * Decimal::from(terms.term_months);
        let total_interest = total_paid - terms.principal;
        debug!(
            principal = %terms.principal,
            annual_rate = %terms.annual_rate,
            term_months = terms.term_months,
            %monthly_payment,
            "computed loan payment"
        );

        AmortizationResult {
            monthly_payment,
            total_paid,
            total_interest,
            schedule,
        }
    }
}

fn require_term(term_months: u32) -> Result<(), CalcError> {
    if term_months == 0 {
        return Err(CalcError::invalid("term_months", "must be at least 1"));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(CalcError::invalid(
            "term_months",
            format!("must not exceed {MAX_TERM_MONTHS}, got {term_months}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;

    fn assert_close(
        actual: Decimal,
        expected: Decimal,
        relative: Decimal,
    ) {
        let tolerance = if expected.is_zero() {
            relative
        } else {
            expected.abs() * relative
        };
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} is not within {relative} of {expected}"
        );
    }

    // =========================================================================
    // compute_payment tests
    // =========================================================================

    #[test]
    fn compute_payment_one_percent_monthly_example() {
        let terms = LoanTerms::new(dec!(12000), dec!(0.12), 12);

        let result = AmortizationEngine::compute_payment(&terms).unwrap();

        assert_eq!(round_half_up(result.monthly_payment), dec!(1066.19));
        assert_eq!(round_half_up(result.total_interest), dec!(794.23));
        assert_eq!(result.total_paid, result.monthly_payment * dec!(12));
        assert!(result.schedule.is_none());
    }

    #[test]
    fn compute_payment_typical_mortgage() {
        let terms = LoanTerms::new(dec!(400000), dec!(0.05), 300);

        let result = AmortizationEngine::compute_payment(&terms).unwrap();

        assert_eq!(round_half_up(result.monthly_payment), dec!(2338.36));
    }

    #[test]
    fn compute_payment_zero_rate_is_linear() {
        let terms = LoanTerms::new(dec!(12000), dec!(0), 12);

        let result = AmortizationEngine::compute_payment(&terms).unwrap();

        assert_eq!(result.monthly_payment, dec!(1000));
        assert_eq!(result.total_interest, dec!(0));
    }

    #[test]
    fn compute_payment_zero_principal() {
        let terms = LoanTerms::new(dec!(0), dec!(0.07), 60);

        let result = AmortizationEngine::compute_payment(&terms).unwrap();

        assert_eq!(result.monthly_payment, dec!(0));
        assert_eq!(result.total_interest, dec!(0));
    }

    #[test]
    fn compute_payment_rejects_zero_term() {
        let terms = LoanTerms::new(dec!(12000), dec!(0.05), 0);

        let result = AmortizationEngine::compute_payment(&terms);

        assert!(matches!(
            result,
            Err(CalcError::InvalidInput { field: "term_months", .. })
        ));
    }

    #[test]
    fn compute_payment_rejects_negative_principal() {
        let terms = LoanTerms::new(dec!(-1), dec!(0.05), 12);

        let result = AmortizationEngine::compute_payment(&terms);

        assert!(matches!(
            result,
            Err(CalcError::InvalidInput { field: "principal", .. })
        ));
    }

    #[test]
    fn compute_payment_rejects_rate_of_one() {
        let terms = LoanTerms::new(dec!(1000), dec!(1), 12);

        assert!(AmortizationEngine::compute_payment(&terms).is_err());
    }

    #[test]
    fn compute_payment_is_idempotent() {
        let terms = LoanTerms::new(dec!(25999.99), dec!(0.0799), 72);

        let first = AmortizationEngine::compute_payment(&terms).unwrap();
        let second = AmortizationEngine::compute_payment(&terms).unwrap();

        assert_eq!(first, second);
    }

    // =========================================================================
    // schedule tests
    // =========================================================================

    #[test]
    fn schedule_conserves_principal() {
        for terms in [
            LoanTerms::new(dec!(12000), dec!(0.12), 12),
            LoanTerms::new(dec!(25999.99), dec!(0.0799), 72),
            LoanTerms::new(dec!(400000), dec!(0.05), 300),
            LoanTerms::new(dec!(35000), dec!(0.0), 120),
            LoanTerms::new(dec!(12000), dec!(0), 7),
        ] {
            let result = AmortizationEngine::schedule(&terms).unwrap();
            let schedule = result.schedule.unwrap();

            assert_eq!(schedule.len(), terms.term_months as usize);
            let repaid: Decimal = schedule.iter().map(|e| e.principal_portion).sum();
            assert_close(repaid, terms.principal, dec!(0.000001));
            let last = schedule.last().unwrap();
            assert_close(last.remaining_balance, Decimal::ZERO, dec!(0.000001));
        }
    }

    #[test]
    fn schedule_first_period_split() {
        let terms = LoanTerms::new(dec!(12000), dec!(0.12), 12);

        let result = AmortizationEngine::schedule(&terms).unwrap().rounded();
        let first = result.schedule.unwrap()[0];

        assert_eq!(first.period, 1);
        assert_eq!(first.interest_portion, dec!(120.00));
        assert_eq!(first.principal_portion, dec!(946.19));
        assert_eq!(first.remaining_balance, dec!(11053.81));
    }

    #[test]
    fn schedule_interest_sums_to_total_interest() {
        let terms = LoanTerms::new(dec!(25999.99), dec!(0.0799), 72);

        let result = AmortizationEngine::schedule(&terms).unwrap();
        let interest: Decimal = result
            .schedule
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.interest_portion)
            .sum();

        assert_close(interest, result.total_interest, dec!(0.000001));
    }

    // =========================================================================
    // solve_for_principal tests
    // =========================================================================

    #[test]
    fn solve_for_principal_inverts_payment() {
        let terms = LoanTerms::new(dec!(400000), dec!(0.05), 300);
        let payment = AmortizationEngine::compute_payment(&terms)
            .unwrap()
            .monthly_payment;

        let principal = AmortizationEngine::solve_for_principal(payment, dec!(0.05), 300).unwrap();

        assert_close(principal, dec!(400000), dec!(0.000001));
    }

    #[test]
    fn solve_for_principal_stress_rate_example() {
        let principal = AmortizationEngine::solve_for_principal(dec!(2450), dec!(0.07), 300).unwrap();

        assert_eq!(round_half_up(principal), dec!(346642.91));
    }

    #[test]
    fn solve_for_principal_zero_rate_is_linear() {
        let principal = AmortizationEngine::solve_for_principal(dec!(500), dec!(0), 24).unwrap();

        assert_eq!(principal, dec!(12000));
    }

    #[test]
    fn compute_payment_long_high_rate_term_approaches_interest_only() {
        let terms = LoanTerms::new(dec!(1000), dec!(0.5), MAX_TERM_MONTHS);

        let result = AmortizationEngine::compute_payment(&terms).unwrap();

        assert_eq!(round_half_up(result.monthly_payment), dec!(41.67));
        assert_close(result.monthly_payment, dec!(1000) * dec!(0.5) / dec!(12), dec!(0.000001));
    }

    #[test]
    fn compute_payment_highest_rate_at_longest_term() {
        let terms = LoanTerms::new(dec!(1000000000000), dec!(0.9999), MAX_TERM_MONTHS);

        let result = AmortizationEngine::compute_payment(&terms).unwrap();

        assert_eq!(round_half_up(result.monthly_payment), dec!(83325000000.00));
    }

    #[test]
    fn solve_for_principal_long_high_rate_term() {
        let principal =
            AmortizationEngine::solve_for_principal(dec!(41.67), dec!(0.5), MAX_TERM_MONTHS).unwrap();

        assert_eq!(round_half_up(principal), dec!(1000.08));
    }

    #[test]
    fn solve_for_principal_rejects_negative_payment() {
        let result = AmortizationEngine::solve_for_principal(dec!(-1), dec!(0.05), 24);

        assert!(matches!(
            result,
            Err(CalcError::InvalidInput { field: "payment", .. })
        ));
    }
}
