use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::models::{Money, Ratio};

/// One slice of a progressive schedule.
///
/// `upper_bound` of `None` means the bracket is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate: Ratio,
}

impl Bracket {
    pub fn new(
        lower_bound: Money,
        upper_bound: Option<Money>,
        rate: Ratio,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Whether `amount` falls inside `(lower_bound, upper_bound]`.
    ///
    /// The first bracket also owns an amount of exactly zero.
    pub fn contains(
        &self,
        amount: Money,
    ) -> bool {
        let above_lower = amount > self.lower_bound
            || (self.lower_bound == Decimal::ZERO && amount == Decimal::ZERO);
        above_lower && self.upper_bound.is_none_or(|upper| amount <= upper)
    }
}

/// The portion of an amount taxed inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate: Ratio,
    pub taxed_portion: Money,
    pub tax: Money,
}

/// An ordered, validated sequence of brackets.
///
/// A `BracketSet` can only be obtained through [`BracketSet::new`] (or
/// deserialization, which goes through the same checks), so every engine
/// receiving one can rely on these invariants:
///
/// - at least one bracket, the first starting at zero
/// - contiguous: each upper bound equals the next lower bound
/// - only the last bracket is unbounded, and it must be
/// - every rate lies in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBracketSet", into = "RawBracketSet")]
pub struct BracketSet {
    name: String,
    brackets: Vec<Bracket>,
}

#[derive(Serialize, Deserialize)]
struct RawBracketSet {
    name: String,
    brackets: Vec<Bracket>,
}

impl TryFrom<RawBracketSet> for BracketSet {
    type Error = ConfigurationError;

    fn try_from(raw: RawBracketSet) -> Result<Self, Self::Error> {
        BracketSet::new(raw.name, raw.brackets)
    }
}

impl From<BracketSet> for RawBracketSet {
    fn from(set: BracketSet) -> Self {
        Self {
            name: set.name,
            brackets: set.brackets,
        }
    }
}

impl BracketSet {
    /// Validates `brackets` and wraps them.
    ///
    /// `name` is only used to label errors and log lines.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found, checking brackets in
    /// ascending order.
    pub fn new(
        name: impl Into<String>,
        brackets: Vec<Bracket>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        validate_brackets(&name, &brackets)?;
        Ok(Self { name, brackets })
    }

    /// A single unbounded bracket taxing every unit at `rate`.
    pub fn flat(
        name: impl Into<String>,
        rate: Ratio,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, vec![Bracket::new(Decimal::ZERO, None, rate)])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Rate of the lowest bracket, used to value non-refundable credits.
    pub fn lowest_rate(&self) -> Ratio {
        self.brackets[0].rate
    }

    /// Highest rate anywhere in the schedule.
    pub fn top_rate(&self) -> Ratio {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

fn validate_brackets(
    name: &str,
    brackets: &[Bracket],
) -> Result<(), ConfigurationError> {
    let Some(first) = brackets.first() else {
        return Err(ConfigurationError::EmptyBracketSet {
            table: name.to_string(),
        });
    };
    if first.lower_bound != Decimal::ZERO {
        return Err(ConfigurationError::FirstBracketNotAtZero {
            table: name.to_string(),
            lower_bound: first.lower_bound,
        });
    }

    let last_index = brackets.len() - 1;
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ConfigurationError::RateOutOfRange {
                table: name.to_string(),
                rate: bracket.rate,
            });
        }

        match bracket.upper_bound {
            None if index != last_index => {
                return Err(ConfigurationError::UnboundedBracketNotLast {
                    table: name.to_string(),
                    index,
                });
            }
            None => {}
            Some(upper) if index == last_index => {
                return Err(ConfigurationError::LastBracketBounded {
                    table: name.to_string(),
                    upper_bound: upper,
                });
            }
            Some(upper) => {
                if upper <= bracket.lower_bound {
                    return Err(ConfigurationError::EmptyBracket {
                        table: name.to_string(),
                        index,
                    });
                }
                let next = &brackets[index + 1];
                if next.lower_bound != upper {
                    return Err(ConfigurationError::NonContiguousBrackets {
                        table: name.to_string(),
                        index,
                        upper_bound: upper,
                        next_lower_bound: next.lower_bound,
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn two_brackets() -> Vec<Bracket> {
        vec![
            Bracket::new(dec!(0), Some(dec!(50000)), dec!(0.10)),
            Bracket::new(dec!(50000), None, dec!(0.20)),
        ]
    }

    // =========================================================================
    // BracketSet::new tests
    // =========================================================================

    #[test]
    fn new_accepts_valid_schedule() {
        let set = BracketSet::new("test", two_brackets()).unwrap();

        assert_eq!(set.brackets().len(), 2);
        assert_eq!(set.name(), "test");
        assert_eq!(set.lowest_rate(), dec!(0.10));
        assert_eq!(set.top_rate(), dec!(0.20));
    }

    #[test]
    fn new_rejects_empty_schedule() {
        let result = BracketSet::new("test", vec![]);

        assert_eq!(
            result,
            Err(ConfigurationError::EmptyBracketSet {
                table: "test".to_string()
            })
        );
    }

    #[test]
    fn new_rejects_first_bracket_above_zero() {
        let mut brackets = two_brackets();
        brackets[0].lower_bound = dec!(100);

        let result = BracketSet::new("test", brackets);

        assert_eq!(
            result,
            Err(ConfigurationError::FirstBracketNotAtZero {
                table: "test".to_string(),
                lower_bound: dec!(100),
            })
        );
    }

    #[test]
    fn new_rejects_gap_between_brackets() {
        let mut brackets = two_brackets();
        brackets[1].lower_bound = dec!(50001);

        let result = BracketSet::new("test", brackets);

        assert_eq!(
            result,
            Err(ConfigurationError::NonContiguousBrackets {
                table: "test".to_string(),
                index: 0,
                upper_bound: dec!(50000),
                next_lower_bound: dec!(50001),
            })
        );
    }

    #[test]
    fn new_rejects_bounded_last_bracket() {
        let mut brackets = two_brackets();
        brackets[1].upper_bound = Some(dec!(90000));

        let result = BracketSet::new("test", brackets);

        assert_eq!(
            result,
            Err(ConfigurationError::LastBracketBounded {
                table: "test".to_string(),
                upper_bound: dec!(90000),
            })
        );
    }

    #[test]
    fn new_rejects_unbounded_bracket_in_the_middle() {
        let mut brackets = two_brackets();
        brackets[0].upper_bound = None;

        let result = BracketSet::new("test", brackets);

        assert_eq!(
            result,
            Err(ConfigurationError::UnboundedBracketNotLast {
                table: "test".to_string(),
                index: 0,
            })
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let mut brackets = two_brackets();
        brackets[1].rate = dec!(1.5);

        let result = BracketSet::new("test", brackets);

        assert_eq!(
            result,
            Err(ConfigurationError::RateOutOfRange {
                table: "test".to_string(),
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn new_rejects_negative_rate() {
        let mut brackets = two_brackets();
        brackets[0].rate = dec!(-0.01);

        let result = BracketSet::new("test", brackets);

        assert!(matches!(
            result,
            Err(ConfigurationError::RateOutOfRange { .. })
        ));
    }

    #[test]
    fn new_rejects_inverted_bracket() {
        let brackets = vec![
            Bracket::new(dec!(0), Some(dec!(0)), dec!(0.10)),
            Bracket::new(dec!(0), None, dec!(0.20)),
        ];

        let result = BracketSet::new("test", brackets);

        assert_eq!(
            result,
            Err(ConfigurationError::EmptyBracket {
                table: "test".to_string(),
                index: 0,
            })
        );
    }

    // =========================================================================
    // Bracket::contains tests
    // =========================================================================

    #[test]
    fn contains_uses_half_open_ranges() {
        let brackets = two_brackets();

        assert!(brackets[0].contains(dec!(0)));
        assert!(brackets[0].contains(dec!(50000)));
        assert!(!brackets[0].contains(dec!(50000.01)));
        assert!(brackets[1].contains(dec!(50000.01)));
        assert!(!brackets[1].contains(dec!(50000)));
    }

    // =========================================================================
    // deserialization tests
    // =========================================================================

    #[test]
    fn raw_conversion_runs_validation() {
        let raw = RawBracketSet {
            name: "bad".to_string(),
            brackets: vec![Bracket::new(dec!(10), None, dec!(0.1))],
        };

        let result = BracketSet::try_from(raw);

        assert!(matches!(
            result,
            Err(ConfigurationError::FirstBracketNotAtZero { .. })
        ));
    }
}
