//! Rate-table loading from CSV files.
//!
//! ## Directory layout
//!
//! A rate-table directory holds one CSV per section. Every file may carry
//! rows for several years; headers are matched by name.
//!
//! | File                   | Required | Columns |
//! |------------------------|----------|---------|
//! | `brackets.csv`         | yes | `year,jurisdiction,lower_bound,upper_bound,rate` |
//! | `contributions.csv`    | yes | `year,name,rate,max_insurable_earnings,exemption` |
//! | `personal_amounts.csv` | yes | `year,federal,provincial,federal_abatement` |
//! | `credit_bands.csv`     | no  | `year,threshold,rate` |
//! | `childcare.csv`        | no  | `year,max_expenses_per_child` |
//! | `lending_rules.csv`    | no  | `year,gds_limit,tds_limit,stress_add_on` |
//!
//! `jurisdiction` is one of `federal`, `provincial` or `land_transfer`. An
//! empty `upper_bound` marks the unbounded top bracket. Bracket rows must be
//! listed in ascending order within each year and jurisdiction.
//!
//! Every year present in `personal_amounts.csv` becomes one [`RateTable`];
//! each table is validated before it is added to the store. A row in any other
//! file for a year without personal amounts is an error, as is a contribution
//! name repeated within one year.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use fincalc_core::{
    BasicPersonalAmounts, Bracket, BracketSet, ChildcareCreditTable, ConfigurationError,
    ContributionRule, CreditBand, LendingRules, RateTable, RateTableStore,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading rate tables.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown jurisdiction '{0}' (expected federal, provincial or land_transfer)")]
    InvalidJurisdiction(String),

    #[error("year {year} has no {section}")]
    MissingSection { year: i32, section: &'static str },

    #[error("year {year}: {section} is listed more than once")]
    DuplicateSection { year: i32, section: &'static str },

    #[error("year {year}: contribution '{name}' is listed more than once")]
    DuplicateContribution { year: i32, name: String },

    #[error("invalid rate table: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

/// Which schedule a bracket row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Jurisdiction {
    Federal,
    Provincial,
    LandTransfer,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "federal",
            Self::Provincial => "provincial",
            Self::LandTransfer => "land_transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "federal" => Some(Self::Federal),
            "provincial" => Some(Self::Provincial),
            "land_transfer" => Some(Self::LandTransfer),
            _ => None,
        }
    }
}

/// One row of `brackets.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub year: i32,
    pub jurisdiction: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// One row of `contributions.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContributionRecord {
    pub year: i32,
    pub name: String,
    pub rate: Decimal,
    pub max_insurable_earnings: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub exemption: Option<Decimal>,
}

/// One row of `personal_amounts.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PersonalAmountRecord {
    pub year: i32,
    pub federal: Decimal,
    pub provincial: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub federal_abatement: Option<Decimal>,
}

/// One row of `credit_bands.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreditBandRecord {
    pub year: i32,
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// One row of `childcare.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChildcareRecord {
    pub year: i32,
    pub max_expenses_per_child: Decimal,
}

/// One row of `lending_rules.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LendingRuleRecord {
    pub year: i32,
    pub gds_limit: Decimal,
    pub tds_limit: Decimal,
    pub stress_add_on: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Parsed rows of every section, before they are grouped into tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTableSources {
    pub brackets: Vec<BracketRecord>,
    pub contributions: Vec<ContributionRecord>,
    pub personal_amounts: Vec<PersonalAmountRecord>,
    pub credit_bands: Vec<CreditBandRecord>,
    pub childcare: Vec<ChildcareRecord>,
    pub lending_rules: Vec<LendingRuleRecord>,
}

/// Builds a [`RateTableStore`] from CSV data.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse records of any section from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<T, R>(reader: R) -> Result<Vec<T>, RateTableLoaderError>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: T = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Reads every section file from `dir`.
    ///
    /// Optional sections that have no file are left empty.
    pub fn read_dir(dir: &Path) -> Result<RateTableSources, RateTableLoaderError> {
        Ok(RateTableSources {
            brackets: read_section(dir, "brackets.csv", true)?,
            contributions: read_section(dir, "contributions.csv", true)?,
            personal_amounts: read_section(dir, "personal_amounts.csv", true)?,
            credit_bands: read_section(dir, "credit_bands.csv", false)?,
            childcare: read_section(dir, "childcare.csv", false)?,
            lending_rules: read_section(dir, "lending_rules.csv", false)?,
        })
    }

    /// Reads, assembles and validates every table found in `dir`.
    pub fn load_dir(dir: &Path) -> Result<RateTableStore, RateTableLoaderError> {
        info!(dir = %dir.display(), "loading rate tables");
        let sources = Self::read_dir(dir)?;
        Self::load(&sources)
    }

    /// Groups `sources` by year into validated tables.
    pub fn load(sources: &RateTableSources) -> Result<RateTableStore, RateTableLoaderError> {
        let tables = Self::assemble(sources)?;
        Ok(RateTableStore::from_tables(tables)?)
    }

    /// Groups `sources` by year into tables without adding them to a store.
    ///
    /// Bracket sets are validated here; the remaining table invariants are
    /// checked when the tables enter a [`RateTableStore`].
    pub fn assemble(sources: &RateTableSources) -> Result<Vec<RateTable>, RateTableLoaderError> {
        let mut brackets: BTreeMap<(i32, Jurisdiction), Vec<Bracket>> = BTreeMap::new();
        for record in &sources.brackets {
            let jurisdiction = Jurisdiction::parse(&record.jurisdiction)
                .ok_or_else(|| RateTableLoaderError::InvalidJurisdiction(record.jurisdiction.clone()))?;
            brackets
                .entry((record.year, jurisdiction))
                .or_default()
                .push(Bracket::new(record.lower_bound, record.upper_bound, record.rate));
        }

        let mut personal: BTreeMap<i32, &PersonalAmountRecord> = BTreeMap::new();
        for record in &sources.personal_amounts {
            if personal.insert(record.year, record).is_some() {
                return Err(RateTableLoaderError::DuplicateSection {
                    year: record.year,
                    section: "personal_amounts",
                });
            }
        }

        require_personal_amounts(&personal, brackets.keys().map(|&(year, _)| year))?;
        require_personal_amounts(&personal, sources.contributions.iter().map(|r| r.year))?;
        require_personal_amounts(&personal, sources.credit_bands.iter().map(|r| r.year))?;
        require_personal_amounts(&personal, sources.childcare.iter().map(|r| r.year))?;
        require_personal_amounts(&personal, sources.lending_rules.iter().map(|r| r.year))?;

        let mut tables = Vec::with_capacity(personal.len());
        for (&year, amounts) in &personal {
            let mut take = |jurisdiction: Jurisdiction| {
                brackets
                    .remove(&(year, jurisdiction))
                    .map(|rows| BracketSet::new(jurisdiction.as_str(), rows))
                    .transpose()
            };

            let federal_brackets = take(Jurisdiction::Federal)?.ok_or(
                RateTableLoaderError::MissingSection {
                    year,
                    section: "federal brackets",
                },
            )?;
            let provincial_brackets = take(Jurisdiction::Provincial)?.ok_or(
                RateTableLoaderError::MissingSection {
                    year,
                    section: "provincial brackets",
                },
            )?;
            let land_transfer_brackets = take(Jurisdiction::LandTransfer)?;

            let mut payroll_contributions: Vec<ContributionRule> = Vec::new();
            for c in sources.contributions.iter().filter(|c| c.year == year) {
                if payroll_contributions.iter().any(|rule| rule.name == c.name) {
                    return Err(RateTableLoaderError::DuplicateContribution {
                        year,
                        name: c.name.clone(),
                    });
                }
                payroll_contributions.push(ContributionRule::new(
                    c.name.clone(),
                    c.rate,
                    c.max_insurable_earnings,
                    c.exemption.unwrap_or(Decimal::ZERO),
                ));
            }

            let childcare_credit = ChildcareCreditTable {
                bands: sources
                    .credit_bands
                    .iter()
                    .filter(|b| b.year == year)
                    .map(|b| CreditBand::new(b.threshold, b.rate))
                    .collect(),
                max_expenses_per_child: single_row(&sources.childcare, year, |r| r.year, "childcare")?
                    .map_or(Decimal::ZERO, |r| r.max_expenses_per_child),
            };

            let lending_rules =
                single_row(&sources.lending_rules, year, |r| r.year, "lending_rules")?.map_or_else(
                    LendingRules::default,
                    |r| LendingRules {
                        gds_limit: r.gds_limit,
                        tds_limit: r.tds_limit,
                        stress_add_on: r.stress_add_on,
                    },
                );

            debug!(year, "assembled rate table");
            tables.push(RateTable {
                year,
                federal_brackets,
                provincial_brackets,
                payroll_contributions,
                basic_personal_amounts: BasicPersonalAmounts {
                    federal: amounts.federal,
                    provincial: amounts.provincial,
                },
                federal_abatement: amounts.federal_abatement.unwrap_or(Decimal::ZERO),
                lending_rules,
                childcare_credit,
                land_transfer_brackets,
            });
        }

        Ok(tables)
    }
}

/// Every row of a section must belong to a year listed in `personal_amounts.csv`.
fn require_personal_amounts(
    personal: &BTreeMap<i32, &PersonalAmountRecord>,
    mut years: impl Iterator<Item = i32>,
) -> Result<(), RateTableLoaderError> {
    match years.find(|year| !personal.contains_key(year)) {
        Some(year) => Err(RateTableLoaderError::MissingSection {
            year,
            section: "personal_amounts",
        }),
        None => Ok(()),
    }
}

fn read_section<T: DeserializeOwned>(
    dir: &Path,
    file_name: &str,
    required: bool,
) -> Result<Vec<T>, RateTableLoaderError> {
    let path = dir.join(file_name);
    if !required && !path.exists() {
        debug!(file = file_name, "optional section not present");
        return Ok(Vec::new());
    }

    let file = File::open(&path).map_err(|source| RateTableLoaderError::Io {
        path: path.clone(),
        source,
    })?;
    RateTableLoader::parse(file)
}

/// The one row of a per-year section for `year`, if present.
fn single_row<'a, T>(
    rows: &'a [T],
    year: i32,
    year_of: impl Fn(&T) -> i32,
    section: &'static str,
) -> Result<Option<&'a T>, RateTableLoaderError> {
    let mut matching = rows.iter().filter(|r| year_of(r) == year);
    let first = matching.next();
    if matching.next().is_some() {
        return Err(RateTableLoaderError::DuplicateSection { year, section });
    }
    Ok(first)
}
