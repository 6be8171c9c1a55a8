//! Net-income calculation from gross employment income.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Federal tax on gross income from the federal brackets |
//! | 2    | Less the federal basic personal credit (amount × lowest rate), minimum 0 |
//! | 3    | Less the federal abatement (share of step 2) |
//! | 4    | Provincial tax, less the provincial basic personal credit, minimum 0 |
//! | 5    | Each payroll contribution on earnings between its exemption and ceiling |
//! | 6    | Total tax = steps 3 + 4 + 5 |
//! | 7    | Net annual = gross − total tax; net monthly = net annual ÷ 12 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::RateTableStore;
//! use fincalc_core::calculations::IncomeTaxCalculator;
//!
//! let store = RateTableStore::builtin().unwrap();
//! let table = store.load(2025).unwrap();
//!
//! let result = IncomeTaxCalculator::new(&table).compute_net(dec!(60000)).unwrap();
//!
//! assert!(result.net_annual < dec!(60000));
//! assert_eq!(result.contributions.len(), 3);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::BracketEngine;
use crate::calculations::common::{MONTHS_PER_YEAR, clamp, max, require_amount};
use crate::error::CalcError;
use crate::models::{BracketSet, ContributionAmount, ContributionRule, Money, NetIncome, RateTable};

/// Computes take-home pay against one year's [`RateTable`].
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    table: &'a RateTable,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(table: &'a RateTable) -> Self {
        Self { table }
    }

    /// Splits `gross_annual` into taxes, contributions and net pay.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] if `gross_annual` is negative or
    /// unreasonably large.
    pub fn compute_net(
        &self,
        gross_annual: Money,
    ) -> Result<NetIncome, CalcError> {
        require_amount("gross_annual", gross_annual)?;

        let table = self.table;
        let basic_federal = self.tax_after_credit(
            gross_annual,
            &table.federal_brackets,
            table.basic_personal_amounts.federal,
        );
        let federal_tax = basic_federal - basic_federal * table.federal_abatement;
        let provincial_tax = self.tax_after_credit(
            gross_annual,
            &table.provincial_brackets,
            table.basic_personal_amounts.provincial,
        );

        let contributions: Vec<ContributionAmount> = table
            .payroll_contributions
            .iter()
            .map(|rule| ContributionAmount {
                name: rule.name.clone(),
                amount: self.contribution(gross_annual, rule),
            })
            .collect();
        let total_contributions: Money = contributions.iter().map(|c| c.amount).sum();

        let total_tax = federal_tax + provincial_tax + total_contributions;
        let net_annual = gross_annual - total_tax;
        let effective_rate = if gross_annual.is_zero() {
            Decimal::ZERO
        } else {
            total_tax / gross_annual
        };

        let federal_marginal = BracketEngine::new(&table.federal_brackets).marginal_rate(gross_annual);
        let provincial_marginal =
            BracketEngine::new(&table.provincial_brackets).marginal_rate(gross_annual);

        debug!(
            year = table.year,
            %gross_annual,
            %total_tax,
            %net_annual,
            "computed net income"
        );

        Ok(NetIncome {
            gross_annual,
            federal_tax,
            provincial_tax,
            contributions,
            total_tax,
            net_annual,
            net_monthly: net_annual / MONTHS_PER_YEAR,
            effective_rate,
            marginal_rate: max(federal_marginal, provincial_marginal),
            combined_marginal_rate: federal_marginal * (Decimal::ONE - table.federal_abatement)
                + provincial_marginal,
        })
    }

    /// Bracket tax less the non-refundable basic personal credit.
    fn tax_after_credit(
        &self,
        gross_annual: Money,
        brackets: &BracketSet,
        basic_personal_amount: Money,
    ) -> Money {
        let tax = BracketEngine::new(brackets).evaluate(gross_annual);
        let credit = basic_personal_amount * brackets.lowest_rate();
        max(tax - credit, Decimal::ZERO)
    }

    /// Contribution on earnings between the rule's exemption and ceiling.
    fn contribution(
        &self,
        gross_annual: Money,
        rule: &ContributionRule,
    ) -> Money {
        let taxable_base = clamp(
            gross_annual - rule.exemption,
            Decimal::ZERO,
            rule.max_insurable_earnings - rule.exemption,
        );
        taxable_base * rule.rate
    }
}
