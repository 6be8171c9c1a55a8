use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::models::{BracketSet, ChildcareCreditTable, Money, Ratio};

/// A capped, floored payroll contribution (pension plan, parental insurance,
/// employment insurance).
///
/// Earnings between `exemption` and `max_insurable_earnings` are charged at
/// `rate`; nothing below the exemption or above the ceiling is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRule {
    pub name: String,
    pub rate: Ratio,
    pub max_insurable_earnings: Money,
    #[serde(default)]
    pub exemption: Money,
}

impl ContributionRule {
    pub fn new(
        name: impl Into<String>,
        rate: Ratio,
        max_insurable_earnings: Money,
        exemption: Money,
    ) -> Self {
        Self {
            name: name.into(),
            rate,
            max_insurable_earnings,
            exemption,
        }
    }

    /// Largest contribution this rule can ever produce.
    pub fn max_contribution(&self) -> Money {
        (self.max_insurable_earnings - self.exemption) * self.rate
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidContribution {
            name: self.name.clone(),
            reason,
        };

        if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
            return Err(invalid(format!("rate {} is outside [0, 1]", self.rate)));
        }
        if self.exemption < Decimal::ZERO {
            return Err(invalid(format!(
                "exemption {} must not be negative",
                self.exemption
            )));
        }
        if self.max_insurable_earnings < self.exemption {
            return Err(invalid(format!(
                "maximum insurable earnings {} is below the exemption {}",
                self.max_insurable_earnings, self.exemption
            )));
        }
        Ok(())
    }
}

/// Basic personal amounts, valued at each jurisdiction's lowest bracket rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasicPersonalAmounts {
    pub federal: Money,
    pub provincial: Money,
}

/// Mortgage underwriting limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingRules {
    /// Gross-debt-service ceiling as a share of gross monthly income.
    pub gds_limit: Ratio,
    /// Total-debt-service ceiling as a share of gross monthly income.
    pub tds_limit: Ratio,
    /// Added to the contract rate to get the qualifying rate.
    pub stress_add_on: Ratio,
}

impl Default for LendingRules {
    fn default() -> Self {
        Self {
            gds_limit: dec!(0.39),
            tds_limit: dec!(0.44),
            stress_add_on: dec!(0.02),
        }
    }
}

impl LendingRules {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for limit in [self.gds_limit, self.tds_limit] {
            if limit <= Decimal::ZERO || limit > Decimal::ONE {
                return Err(ConfigurationError::InvalidLimit {
                    table: "lending_rules".to_string(),
                    limit,
                });
            }
        }
        if self.stress_add_on < Decimal::ZERO || self.stress_add_on >= Decimal::ONE {
            return Err(ConfigurationError::RateOutOfRange {
                table: "lending_rules".to_string(),
                rate: self.stress_add_on,
            });
        }
        Ok(())
    }
}

/// Everything that changes from one tax year to the next.
///
/// Tables are validated once with [`RateTable::validate`] when they enter a
/// [`RateTableStore`](crate::RateTableStore) and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub year: i32,
    pub federal_brackets: BracketSet,
    pub provincial_brackets: BracketSet,
    pub payroll_contributions: Vec<ContributionRule>,
    pub basic_personal_amounts: BasicPersonalAmounts,
    /// Share of basic federal tax refunded to residents of a province that
    /// collects its own income tax.
    #[serde(default)]
    pub federal_abatement: Ratio,
    #[serde(default)]
    pub lending_rules: LendingRules,
    #[serde(default)]
    pub childcare_credit: ChildcareCreditTable,
    #[serde(default)]
    pub land_transfer_brackets: Option<BracketSet>,
}

impl RateTable {
    /// Checks every invariant not already enforced by [`BracketSet`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for rule in &self.payroll_contributions {
            rule.validate()?;
        }

        for amount in [
            self.basic_personal_amounts.federal,
            self.basic_personal_amounts.provincial,
        ] {
            if amount < Decimal::ZERO {
                return Err(ConfigurationError::NegativeAmount {
                    table: "basic_personal_amounts".to_string(),
                    amount,
                });
            }
        }

        if self.federal_abatement < Decimal::ZERO || self.federal_abatement > Decimal::ONE {
            return Err(ConfigurationError::RateOutOfRange {
                table: "federal_abatement".to_string(),
                rate: self.federal_abatement,
            });
        }

        self.lending_rules.validate()?;
        validate_childcare(&self.childcare_credit)
    }
}

fn validate_childcare(table: &ChildcareCreditTable) -> Result<(), ConfigurationError> {
    const NAME: &str = "childcare_credit";

    if table.max_expenses_per_child < Decimal::ZERO {
        return Err(ConfigurationError::NegativeAmount {
            table: NAME.to_string(),
            amount: table.max_expenses_per_child,
        });
    }

    for (index, band) in table.bands.iter().enumerate() {
        if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
            return Err(ConfigurationError::RateOutOfRange {
                table: NAME.to_string(),
                rate: band.rate,
            });
        }
        if band.threshold < Decimal::ZERO {
            return Err(ConfigurationError::NegativeAmount {
                table: NAME.to_string(),
                amount: band.threshold,
            });
        }
        if index > 0 && band.threshold <= table.bands[index - 1].threshold {
            return Err(ConfigurationError::UnsortedCreditBands {
                table: NAME.to_string(),
                index,
            });
        }
    }

    Ok(())
}
