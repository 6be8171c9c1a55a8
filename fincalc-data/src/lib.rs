pub mod loader;
pub mod logging;

pub use loader::{
    BracketRecord, ChildcareRecord, ContributionRecord, CreditBandRecord, Jurisdiction,
    LendingRuleRecord, PersonalAmountRecord, RateTableLoader, RateTableLoaderError,
    RateTableSources,
};
