//! Sliding-scale credit lookups.
//!
//! Administrative credit schedules are step functions of income: every
//! income inside a band gets that band's rate, with no interpolation between
//! bands.

use rust_decimal::Decimal;

use crate::calculations::common::{min, require_amount};
use crate::error::CalcError;
use crate::models::{ChildcareCredit, ChildcareCreditTable, CreditBand, Money, Ratio};

/// Stateless band lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditLookupEngine;

impl CreditLookupEngine {
    /// Rate of the last band whose threshold is at or below `income`.
    ///
    /// `bands` must be sorted ascending by threshold, which
    /// [`RateTable::validate`](crate::RateTable::validate) guarantees for
    /// configured schedules. Incomes below the first threshold get zero.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fincalc_core::CreditBand;
    /// use fincalc_core::calculations::CreditLookupEngine;
    ///
    /// let bands = vec![
    ///     CreditBand::new(dec!(0), dec!(0.78)),
    ///     CreditBand::new(dec!(24000), dec!(0.75)),
    ///     CreditBand::new(dec!(42000), dec!(0.70)),
    /// ];
    ///
    /// assert_eq!(CreditLookupEngine::rate_for(dec!(23999.99), &bands), dec!(0.78));
    /// assert_eq!(CreditLookupEngine::rate_for(dec!(24000), &bands), dec!(0.75));
    /// ```
    pub fn rate_for(
        income: Money,
        bands: &[CreditBand],
    ) -> Ratio {
        bands
            .iter()
            .take_while(|band| band.threshold <= income)
            .last()
            .map_or(Decimal::ZERO, |band| band.rate)
    }

    /// Refundable childcare credit for `children` children.
    ///
    /// Eligible expenses are capped at the table's per-child ceiling times
    /// the number of children, then multiplied by the family-income rate.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] for negative expenses or income.
    pub fn childcare_credit(
        expenses: Money,
        children: u32,
        family_income: Money,
        table: &ChildcareCreditTable,
    ) -> Result<ChildcareCredit, CalcError> {
        require_amount("expenses", expenses)?;
        require_amount("family_income", family_income)?;

        if children == 0 || expenses.is_zero() {
            return Ok(ChildcareCredit::none());
        }

        let ceiling = table.max_expenses_per_child * Decimal::from(children);
        let eligible_expenses = min(expenses, ceiling);
        let rate = Self::rate_for(family_income, &table.bands);

        Ok(ChildcareCredit {
            rate,
            eligible_expenses,
            credit: eligible_expenses * rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bands() -> Vec<CreditBand> {
        vec![
            CreditBand::new(dec!(0), dec!(0.78)),
            CreditBand::new(dec!(24000), dec!(0.75)),
            CreditBand::new(dec!(42000), dec!(0.70)),
            CreditBand::new(dec!(120000), dec!(0.67)),
        ]
    }

    fn table() -> ChildcareCreditTable {
        ChildcareCreditTable {
            bands: bands(),
            max_expenses_per_child: dec!(11780),
        }
    }

    // =========================================================================
    // rate_for tests
    // =========================================================================

    #[test]
    fn rate_for_is_a_step_function() {
        let bands = bands();

        assert_eq!(CreditLookupEngine::rate_for(dec!(0), &bands), dec!(0.78));
        assert_eq!(CreditLookupEngine::rate_for(dec!(41999.99), &bands), dec!(0.75));
        assert_eq!(CreditLookupEngine::rate_for(dec!(42000), &bands), dec!(0.70));
        assert_eq!(CreditLookupEngine::rate_for(dec!(80000), &bands), dec!(0.70));
        assert_eq!(CreditLookupEngine::rate_for(dec!(5000000), &bands), dec!(0.67));
    }

    #[test]
    fn rate_for_below_first_threshold_is_zero() {
        let bands = vec![CreditBand::new(dec!(1000), dec!(0.5))];

        assert_eq!(CreditLookupEngine::rate_for(dec!(999), &bands), dec!(0));
    }

    #[test]
    fn rate_for_empty_schedule_is_zero() {
        assert_eq!(CreditLookupEngine::rate_for(dec!(50000), &[]), dec!(0));
    }

    // =========================================================================
    // childcare_credit tests
    // =========================================================================

    #[test]
    fn childcare_credit_under_ceiling() {
        let credit =
            CreditLookupEngine::childcare_credit(dec!(8000), 1, dec!(60000), &table()).unwrap();

        assert_eq!(credit.rate, dec!(0.70));
        assert_eq!(credit.eligible_expenses, dec!(8000));
        assert_eq!(credit.credit, dec!(5600));
    }

    #[test]
    fn childcare_credit_caps_expenses_per_child() {
        let credit =
            CreditLookupEngine::childcare_credit(dec!(30000), 2, dec!(20000), &table()).unwrap();

        assert_eq!(credit.eligible_expenses, dec!(23560));
        assert_eq!(credit.credit, dec!(18376.80));
    }

    #[test]
    fn childcare_credit_without_children_is_zero() {
        let credit =
            CreditLookupEngine::childcare_credit(dec!(5000), 0, dec!(60000), &table()).unwrap();

        assert_eq!(credit, ChildcareCredit::none());
    }

    #[test]
    fn childcare_credit_rejects_negative_expenses() {
        let result = CreditLookupEngine::childcare_credit(dec!(-1), 1, dec!(60000), &table());

        assert!(matches!(
            result,
            Err(CalcError::InvalidInput { field: "expenses", .. })
        ));
    }
}
