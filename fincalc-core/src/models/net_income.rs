use serde::{Deserialize, Serialize};

use crate::calculations::common::{round_half_up, round_ratio};
use crate::models::{Money, Ratio};

/// A named payroll deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionAmount {
    pub name: String,
    pub amount: Money,
}

/// Breakdown of gross annual employment income into taxes and take-home pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetIncome {
    pub gross_annual: Money,
    /// After the basic personal credit and the federal abatement.
    pub federal_tax: Money,
    pub provincial_tax: Money,
    pub contributions: Vec<ContributionAmount>,
    pub total_tax: Money,
    pub net_annual: Money,
    pub net_monthly: Money,
    pub effective_rate: Ratio,
    /// Higher of the federal and provincial bracket rates at `gross_annual`.
    pub marginal_rate: Ratio,
    /// Federal rate net of abatement plus provincial rate.
    pub combined_marginal_rate: Ratio,
}

impl NetIncome {
    pub fn total_contributions(&self) -> Money {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    pub fn rounded(&self) -> Self {
        Self {
            gross_annual: round_half_up(self.gross_annual),
            federal_tax: round_half_up(self.federal_tax),
            provincial_tax: round_half_up(self.provincial_tax),
            contributions: self
                .contributions
                .iter()
                .map(|c| ContributionAmount {
                    name: c.name.clone(),
                    amount: round_half_up(c.amount),
                })
                .collect(),
            total_tax: round_half_up(self.total_tax),
            net_annual: round_half_up(self.net_annual),
            net_monthly: round_half_up(self.net_monthly),
            effective_rate: round_ratio(self.effective_rate),
            marginal_rate: round_ratio(self.marginal_rate),
            combined_marginal_rate: round_ratio(self.combined_marginal_rate),
        }
    }
}
