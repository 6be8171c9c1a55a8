use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{Money, Ratio};

/// Inputs to a compound-growth projection with monthly deposits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthInputs {
    pub initial: Money,
    /// Deposited at the end of every month.
    pub monthly_contribution: Money,
    /// Nominal annual rate, compounded monthly.
    pub annual_rate: Ratio,
    pub years: u32,
}

/// Cumulative position at the end of `year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearEntry {
    pub year: u32,
    pub contributed: Money,
    pub interest: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthResult {
    pub final_value: Money,
    pub total_contributed: Money,
    pub total_interest: Money,
    /// Entries for year 0 through the last year inclusive.
    pub yearly: Vec<YearEntry>,
}

impl GrowthResult {
    pub fn rounded(&self) -> Self {
        Self {
            final_value: round_half_up(self.final_value),
            total_contributed: round_half_up(self.total_contributed),
            total_interest: round_half_up(self.total_interest),
            yearly: self
                .yearly
                .iter()
                .map(|y| YearEntry {
                    year: y.year,
                    contributed: round_half_up(y.contributed),
                    interest: round_half_up(y.interest),
                    total: round_half_up(y.total),
                })
                .collect(),
        }
    }
}
