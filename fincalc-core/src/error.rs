//! Error types shared by every engine in this crate.
//!
//! Two kinds exist. [`CalcError`] is returned per call when a caller hands an
//! engine an argument outside its domain; the caller can re-prompt and retry.
//! [`ConfigurationError`] is returned only while a rate table is being
//! validated or looked up, and is meant to stop startup.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by a calculation for out-of-domain input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// A caller-supplied argument is outside the accepted domain.
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl CalcError {
    pub(crate) fn invalid(
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the rejected input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }
}

/// Structural problems found while validating a rate table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{table}: bracket set is empty")]
    EmptyBracketSet { table: String },

    #[error("{table}: first bracket starts at {lower_bound}, expected 0")]
    FirstBracketNotAtZero { table: String, lower_bound: Decimal },

    #[error("{table}: bracket {index} ends at {upper_bound} but the next starts at {next_lower_bound}")]
    NonContiguousBrackets {
        table: String,
        index: usize,
        upper_bound: Decimal,
        next_lower_bound: Decimal,
    },

    #[error("{table}: bracket {index} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast { table: String, index: usize },

    #[error("{table}: last bracket must be unbounded, found upper bound {upper_bound}")]
    LastBracketBounded { table: String, upper_bound: Decimal },

    #[error("{table}: bracket {index} has an empty or inverted range")]
    EmptyBracket { table: String, index: usize },

    #[error("{table}: rate {rate} is outside [0, 1]")]
    RateOutOfRange { table: String, rate: Decimal },

    #[error("contribution `{name}`: {reason}")]
    InvalidContribution { name: String, reason: String },

    #[error("{table}: credit band thresholds must be strictly ascending (band {index})")]
    UnsortedCreditBands { table: String, index: usize },

    #[error("{table}: amount {amount} must not be negative")]
    NegativeAmount { table: String, amount: Decimal },

    #[error("{table}: limit {limit} must lie in (0, 1]")]
    InvalidLimit { table: String, limit: Decimal },

    #[error("no rate table configured for year {0}")]
    UnknownYear(i32),

    #[error("rate table for year {0} is already registered")]
    DuplicateYear(i32),
}
