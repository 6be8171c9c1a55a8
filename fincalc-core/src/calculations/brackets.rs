//! Progressive bracket evaluation.
//!
//! Every schedule in this crate that taxes increasing slices of an amount at
//! increasing rates goes through [`BracketEngine`]: federal and provincial
//! income tax as well as land-transfer duties.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculations::BracketEngine;
//! use fincalc_core::{Bracket, BracketSet};
//!
//! let brackets = BracketSet::new(
//!     "example",
//!     vec![
//!         Bracket::new(dec!(0), Some(dec!(50000)), dec!(0.10)),
//!         Bracket::new(dec!(50000), None, dec!(0.20)),
//!     ],
//! )
//! .unwrap();
//!
//! let engine = BracketEngine::new(&brackets);
//!
//! assert_eq!(engine.evaluate(dec!(80000)), dec!(11000));
//! assert_eq!(engine.marginal_rate(dec!(80000)), dec!(0.20));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::min;
use crate::models::{BracketSet, BracketSlice, Money, Ratio};

/// Evaluates amounts against one validated [`BracketSet`].
#[derive(Debug, Clone, Copy)]
pub struct BracketEngine<'a> {
    brackets: &'a BracketSet,
}

impl<'a> BracketEngine<'a> {
    pub fn new(brackets: &'a BracketSet) -> Self {
        Self { brackets }
    }

    /// Total amount owed on `amount`.
    ///
    /// Zero and negative amounts owe nothing. The result never decreases as
    /// `amount` grows.
    pub fn evaluate(
        &self,
        amount: Money,
    ) -> Money {
        self.slices(amount).map(|slice| slice.tax).sum()
    }

    /// The per-bracket portions of `amount` and the tax on each.
    ///
    /// Brackets `amount` does not reach are omitted.
    pub fn breakdown(
        &self,
        amount: Money,
    ) -> Vec<BracketSlice> {
        self.slices(amount).collect()
    }

    /// Rate of the bracket `amount` falls in.
    ///
    /// Amounts at or below zero report the lowest bracket's rate.
    pub fn marginal_rate(
        &self,
        amount: Money,
    ) -> Ratio {
        let amount = if amount < Decimal::ZERO {
            Decimal::ZERO
        } else {
            amount
        };

        self.brackets
            .brackets()
            .iter()
            .find(|b| b.contains(amount))
            .map(|b| b.rate)
            .unwrap_or_else(|| self.brackets.top_rate())
    }

    fn slices(
        &self,
        amount: Money,
    ) -> impl Iterator<Item = BracketSlice> + '_ {
        self.brackets
            .brackets()
            .iter()
            .take_while(move |b| amount > b.lower_bound)
            .map(move |b| {
                let top = b.upper_bound.map_or(amount, |upper| min(upper, amount));
                let taxed_portion = top - b.lower_bound;
                BracketSlice {
                    lower_bound: b.lower_bound,
                    upper_bound: b.upper_bound,
                    rate: b.rate,
                    taxed_portion,
                    tax: taxed_portion * b.rate,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Bracket;

    fn two_brackets() -> BracketSet {
        BracketSet::new(
            "two",
            vec![
                Bracket::new(dec!(0), Some(dec!(50000)), dec!(0.10)),
                Bracket::new(dec!(50000), None, dec!(0.20)),
            ],
        )
        .unwrap()
    }

    fn federal_2025() -> BracketSet {
        BracketSet::new(
            "federal",
            vec![
                Bracket::new(dec!(0), Some(dec!(57375)), dec!(0.15)),
                Bracket::new(dec!(57375), Some(dec!(114750)), dec!(0.205)),
                Bracket::new(dec!(114750), Some(dec!(177882)), dec!(0.26)),
                Bracket::new(dec!(177882), Some(dec!(253414)), dec!(0.29)),
                Bracket::new(dec!(253414), None, dec!(0.33)),
            ],
        )
        .unwrap()
    }

    // =========================================================================
    // evaluate tests
    // =========================================================================

    #[test]
    fn evaluate_two_bracket_example() {
        let brackets = two_brackets();
        let engine = BracketEngine::new(&brackets);

        // 50000 * 0.10 + 30000 * 0.20
        assert_eq!(engine.evaluate(dec!(80000)), dec!(11000));
    }

    #[test]
    fn evaluate_single_bracket_is_exact_product() {
        let brackets = BracketSet::flat("flat", dec!(0.1375)).unwrap();
        let engine = BracketEngine::new(&brackets);

        for amount in [dec!(0.01), dec!(1234.56), dec!(98765.4321), dec!(1000000)] {
            assert_eq!(engine.evaluate(amount), amount * dec!(0.1375));
        }
    }

    #[test]
    fn evaluate_returns_zero_for_zero_and_negative_amounts() {
        let brackets = two_brackets();
        let engine = BracketEngine::new(&brackets);

        assert_eq!(engine.evaluate(dec!(0)), dec!(0));
        assert_eq!(engine.evaluate(dec!(-5000)), dec!(0));
    }

    #[test]
    fn evaluate_at_bracket_boundary() {
        let brackets = two_brackets();
        let engine = BracketEngine::new(&brackets);

        assert_eq!(engine.evaluate(dec!(50000)), dec!(5000));
    }

    #[test]
    fn evaluate_highest_bracket() {
        let brackets = federal_2025();
        let engine = BracketEngine::new(&brackets);

        // 57375*.15 + 57375*.205 + 63132*.26 + 75532*.29 + 46586*.33
        let expected = dec!(8606.25) + dec!(11761.875) + dec!(16414.32) + dec!(21904.28)
            + dec!(15373.38);
        assert_eq!(engine.evaluate(dec!(300000)), expected);
    }

    #[test]
    fn evaluate_is_monotonic() {
        let brackets = federal_2025();
        let engine = BracketEngine::new(&brackets);

        let mut previous = Decimal::ZERO;
        let mut amount = dec!(-1000);
        while amount <= dec!(400000) {
            let tax = engine.evaluate(amount);
            assert!(tax >= previous, "tax decreased at {amount}");
            previous = tax;
            amount += dec!(997.13);
        }
    }

    #[test]
    fn evaluate_is_idempotent() {
        let brackets = federal_2025();
        let engine = BracketEngine::new(&brackets);

        assert_eq!(engine.evaluate(dec!(123456.78)), engine.evaluate(dec!(123456.78)));
    }

    // =========================================================================
    // breakdown tests
    // =========================================================================

    #[test]
    fn breakdown_sums_to_evaluate() {
        let brackets = federal_2025();
        let engine = BracketEngine::new(&brackets);

        let slices = engine.breakdown(dec!(150000));

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[2].taxed_portion, dec!(35250));
        let total: Decimal = slices.iter().map(|s| s.tax).sum();
        assert_eq!(total, engine.evaluate(dec!(150000)));
    }

    #[test]
    fn breakdown_is_empty_for_zero() {
        let brackets = two_brackets();
        let engine = BracketEngine::new(&brackets);

        assert!(engine.breakdown(dec!(0)).is_empty());
    }

    // =========================================================================
    // marginal_rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_finds_containing_bracket() {
        let brackets = federal_2025();
        let engine = BracketEngine::new(&brackets);

        assert_eq!(engine.marginal_rate(dec!(0)), dec!(0.15));
        assert_eq!(engine.marginal_rate(dec!(57375)), dec!(0.15));
        assert_eq!(engine.marginal_rate(dec!(57375.01)), dec!(0.205));
        assert_eq!(engine.marginal_rate(dec!(1000000)), dec!(0.33));
    }

    #[test]
    fn marginal_rate_of_negative_amount_is_lowest_rate() {
        let brackets = two_brackets();
        let engine = BracketEngine::new(&brackets);

        assert_eq!(engine.marginal_rate(dec!(-10)), dec!(0.10));
    }
}
