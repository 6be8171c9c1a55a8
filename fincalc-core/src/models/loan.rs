use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{Money, Ratio};

/// Terms of a fixed-payment, monthly-compounded loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Nominal annual rate as a fraction (`0.0799` for 7.99%).
    pub annual_rate: Ratio,
    pub term_months: u32,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        annual_rate: Ratio,
        term_months: u32,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
        }
    }
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based payment number.
    pub period: u32,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Present only when a schedule was requested.
    pub schedule: Option<Vec<ScheduleEntry>>,
}

impl AmortizationResult {
    /// Copy with every amount rounded to cents for display.
    pub fn rounded(&self) -> Self {
        Self {
            monthly_payment: round_half_up(self.monthly_payment),
            total_paid: round_half_up(self.total_paid),
            total_interest: round_half_up(self.total_interest),
            schedule: self.schedule.as_ref().map(|entries| {
                entries
                    .iter()
                    .map(|e| ScheduleEntry {
                        period: e.period,
                        interest_portion: round_half_up(e.interest_portion),
                        principal_portion: round_half_up(e.principal_portion),
                        remaining_balance: round_half_up(e.remaining_balance),
                    })
                    .collect()
            }),
        }
    }
}
