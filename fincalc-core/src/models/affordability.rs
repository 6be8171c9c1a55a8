use serde::{Deserialize, Serialize};

use crate::calculations::common::{round_half_up, round_ratio};
use crate::models::{Money, Ratio};

/// Household figures used to size a mortgage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityInputs {
    pub annual_income: Money,
    /// Other monthly debt payments (car, student loan, cards).
    pub monthly_debts: Money,
    pub down_payment: Money,
    pub contract_rate: Ratio,
    pub amortization_years: u32,
    /// Property tax, heating and condo fees per month.
    pub monthly_housing_expenses: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    /// Monthly income times the gross-debt-service limit.
    pub gds_limit: Money,
    /// Monthly income times the total-debt-service limit, less other debts.
    pub tds_limit: Money,
    /// Largest mortgage payment both debt-service ratios allow.
    pub max_monthly_payment: Money,
    pub max_mortgage: Money,
    pub max_purchase_price: Money,
    /// Rate the mortgage was qualified at.
    pub qualifying_rate: Ratio,
    /// Payment on `max_mortgage` at the contract rate.
    pub contract_payment: Money,
    pub gds_ratio: Ratio,
    pub tds_ratio: Ratio,
}

impl AffordabilityResult {
    pub fn rounded(&self) -> Self {
        Self {
            gds_limit: round_half_up(self.gds_limit),
            tds_limit: round_half_up(self.tds_limit),
            max_monthly_payment: round_half_up(self.max_monthly_payment),
            max_mortgage: round_half_up(self.max_mortgage),
            max_purchase_price: round_half_up(self.max_purchase_price),
            qualifying_rate: round_ratio(self.qualifying_rate),
            contract_payment: round_half_up(self.contract_payment),
            gds_ratio: round_ratio(self.gds_ratio),
            tds_ratio: round_ratio(self.tds_ratio),
        }
    }
}
