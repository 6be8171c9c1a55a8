use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{round_half_up, round_ratio};
use crate::models::{Money, Ratio};

/// One step of a sliding-scale credit schedule: incomes at or above
/// `threshold` (and below the next band's threshold) get `rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBand {
    pub threshold: Money,
    pub rate: Ratio,
}

impl CreditBand {
    pub fn new(
        threshold: Money,
        rate: Ratio,
    ) -> Self {
        Self { threshold, rate }
    }
}

/// Refundable childcare-expense credit schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildcareCreditTable {
    /// Credit rate by family income, ascending by threshold.
    pub bands: Vec<CreditBand>,
    /// Ceiling on eligible expenses for each child.
    pub max_expenses_per_child: Money,
}

/// Result of a childcare-credit lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildcareCredit {
    pub rate: Ratio,
    pub eligible_expenses: Money,
    pub credit: Money,
}

impl ChildcareCredit {
    pub fn rounded(&self) -> Self {
        Self {
            rate: round_ratio(self.rate),
            eligible_expenses: round_half_up(self.eligible_expenses),
            credit: round_half_up(self.credit),
        }
    }

    pub(crate) fn none() -> Self {
        Self {
            rate: Decimal::ZERO,
            eligible_expenses: Decimal::ZERO,
            credit: Decimal::ZERO,
        }
    }
}
