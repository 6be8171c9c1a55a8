//! Federal and Quebec rate tables compiled into the crate.
//!
//! Amounts are the published indexed figures for each year. QPP combines
//! the base and first additional contribution; the second additional tier
//! is not modelled.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ConfigurationError;
use crate::models::{
    BasicPersonalAmounts, Bracket, BracketSet, ChildcareCreditTable, ContributionRule, CreditBand,
    LendingRules, RateTable,
};

pub(super) fn tables() -> Result<Vec<RateTable>, ConfigurationError> {
    Ok(vec![table_2024()?, table_2025()?])
}

/// Builds a contiguous set from `(upper bound, rate)` pairs, the last pair
/// having no upper bound.
fn schedule(
    name: &str,
    steps: &[(Option<Decimal>, Decimal)],
) -> Result<BracketSet, ConfigurationError> {
    let mut lower_bound = Decimal::ZERO;
    let mut brackets = Vec::with_capacity(steps.len());
    for &(upper_bound, rate) in steps {
        brackets.push(Bracket::new(lower_bound, upper_bound, rate));
        if let Some(upper) = upper_bound {
            lower_bound = upper;
        }
    }
    BracketSet::new(name, brackets)
}

fn childcare_bands() -> Vec<CreditBand> {
    vec![
        CreditBand::new(dec!(0), dec!(0.78)),
        CreditBand::new(dec!(24000), dec!(0.75)),
        CreditBand::new(dec!(42000), dec!(0.74)),
        CreditBand::new(dec!(44000), dec!(0.73)),
        CreditBand::new(dec!(46000), dec!(0.72)),
        CreditBand::new(dec!(48000), dec!(0.71)),
        CreditBand::new(dec!(50000), dec!(0.70)),
        CreditBand::new(dec!(85000), dec!(0.69)),
        CreditBand::new(dec!(100000), dec!(0.68)),
        CreditBand::new(dec!(120000), dec!(0.67)),
    ]
}

fn table_2024() -> Result<RateTable, ConfigurationError> {
    Ok(RateTable {
        year: 2024,
        federal_brackets: schedule(
            "federal",
            &[
                (Some(dec!(55867)), dec!(0.15)),
                (Some(dec!(111733)), dec!(0.205)),
                (Some(dec!(173205)), dec!(0.26)),
                (Some(dec!(246752)), dec!(0.29)),
                (None, dec!(0.33)),
            ],
        )?,
        provincial_brackets: schedule(
            "provincial",
            &[
                (Some(dec!(51780)), dec!(0.14)),
                (Some(dec!(103545)), dec!(0.19)),
                (Some(dec!(126000)), dec!(0.24)),
                (None, dec!(0.2575)),
            ],
        )?,
        payroll_contributions: vec![
            ContributionRule::new("QPP", dec!(0.064), dec!(68500), dec!(3500)),
            ContributionRule::new("QPIP", dec!(0.00494), dec!(94000), dec!(0)),
            ContributionRule::new("EI", dec!(0.0132), dec!(63200), dec!(0)),
        ],
        basic_personal_amounts: BasicPersonalAmounts {
            federal: dec!(15705),
            provincial: dec!(18056),
        },
        federal_abatement: dec!(0.165),
        lending_rules: LendingRules::default(),
        childcare_credit: ChildcareCreditTable {
            bands: childcare_bands(),
            max_expenses_per_child: dec!(11360),
        },
        land_transfer_brackets: Some(schedule(
            "land_transfer",
            &[
                (Some(dec!(55200)), dec!(0.005)),
                (Some(dec!(276200)), dec!(0.01)),
                (None, dec!(0.015)),
            ],
        )?),
    })
}

fn table_2025() -> Result<RateTable, ConfigurationError> {
    Ok(RateTable {
        year: 2025,
        federal_brackets: schedule(
            "federal",
            &[
                (Some(dec!(57375)), dec!(0.15)),
                (Some(dec!(114750)), dec!(0.205)),
                (Some(dec!(177882)), dec!(0.26)),
                (Some(dec!(253414)), dec!(0.29)),
                (None, dec!(0.33)),
            ],
        )?,
        provincial_brackets: schedule(
            "provincial",
            &[
                (Some(dec!(53255)), dec!(0.14)),
                (Some(dec!(106495)), dec!(0.19)),
                (Some(dec!(129590)), dec!(0.24)),
                (None, dec!(0.2575)),
            ],
        )?,
        payroll_contributions: vec![
            ContributionRule::new("QPP", dec!(0.064), dec!(71300), dec!(3500)),
            ContributionRule::new("QPIP", dec!(0.00494), dec!(98000), dec!(0)),
            ContributionRule::new("EI", dec!(0.0131), dec!(65700), dec!(0)),
        ],
        basic_personal_amounts: BasicPersonalAmounts {
            federal: dec!(16129),
            provincial: dec!(18571),
        },
        federal_abatement: dec!(0.165),
        lending_rules: LendingRules::default(),
        childcare_credit: ChildcareCreditTable {
            bands: childcare_bands(),
            max_expenses_per_child: dec!(11780),
        },
        land_transfer_brackets: Some(schedule(
            "land_transfer",
            &[
                (Some(dec!(61500)), dec!(0.005)),
                (Some(dec!(307800)), dec!(0.01)),
                (None, dec!(0.015)),
            ],
        )?),
    })
}
