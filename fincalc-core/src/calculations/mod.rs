//! Calculation engines.
//!
//! Every engine is a pure function of its inputs and, where relevant, a
//! validated [`RateTable`](crate::RateTable); nothing is cached between calls.

pub mod affordability;
pub mod amortization;
pub mod brackets;
pub mod common;
pub mod credit_lookup;
pub mod growth;
pub mod income_tax;
pub mod land_transfer;

pub use affordability::AffordabilityEvaluator;
pub use amortization::AmortizationEngine;
pub use brackets::BracketEngine;
pub use credit_lookup::CreditLookupEngine;
pub use growth::GrowthProjector;
pub use income_tax::IncomeTaxCalculator;
pub use land_transfer::land_transfer_tax;
