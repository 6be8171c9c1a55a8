mod affordability;
mod bracket;
mod credit;
mod growth;
mod loan;
mod net_income;
mod rate_table;

use rust_decimal::Decimal;

/// A currency amount. Engines never use binary floating point for money.
pub type Money = Decimal;

/// A fraction such as a tax rate (`0.15`) or an interest rate (`0.0799`).
pub type Ratio = Decimal;

pub use affordability::{AffordabilityInputs, AffordabilityResult};
pub use bracket::{Bracket, BracketSet, BracketSlice};
pub use credit::{ChildcareCredit, ChildcareCreditTable, CreditBand};
pub use growth::{GrowthInputs, GrowthResult, YearEntry};
pub use loan::{AmortizationResult, LoanTerms, ScheduleEntry};
pub use net_income::{ContributionAmount, NetIncome};
pub use rate_table::{BasicPersonalAmounts, ContributionRule, LendingRules, RateTable};
