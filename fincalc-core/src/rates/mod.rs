//! Versioned rate tables.
//!
//! A [`RateTableStore`] is filled once at startup, either from the built-in
//! tables or by a loader reading configuration files, and is read-only from
//! then on. Tables are validated as they enter the store, so a malformed
//! table stops startup instead of surfacing in the middle of a calculation.

mod builtin;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::error::ConfigurationError;
use crate::models::RateTable;

/// Validated rate tables keyed by year.
///
/// Cloning the store is cheap; tables are shared behind [`Arc`].
#[derive(Debug, Clone, Default)]
pub struct RateTableStore {
    tables: BTreeMap<i32, Arc<RateTable>>,
}

impl RateTableStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the tables compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a built-in table fails validation.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::from_tables(builtin::tables()?)
    }

    /// Validates and inserts every table in `tables`.
    pub fn from_tables(
        tables: impl IntoIterator<Item = RateTable>,
    ) -> Result<Self, ConfigurationError> {
        let mut store = Self::new();
        for table in tables {
            store.insert(table)?;
        }
        Ok(store)
    }

    /// Validates `table` and adds it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateYear`] if the year is already
    /// present, or whatever [`RateTable::validate`] reports.
    pub fn insert(
        &mut self,
        table: RateTable,
    ) -> Result<(), ConfigurationError> {
        if self.tables.contains_key(&table.year) {
            return Err(ConfigurationError::DuplicateYear(table.year));
        }
        table.validate()?;

        info!(
            year = table.year,
            federal_brackets = table.federal_brackets.brackets().len(),
            provincial_brackets = table.provincial_brackets.brackets().len(),
            contributions = table.payroll_contributions.len(),
            "rate table registered"
        );
        self.tables.insert(table.year, Arc::new(table));
        Ok(())
    }

    /// Table for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownYear`] if no table was loaded for
    /// that year.
    pub fn load(
        &self,
        year: i32,
    ) -> Result<Arc<RateTable>, ConfigurationError> {
        self.tables
            .get(&year)
            .cloned()
            .ok_or(ConfigurationError::UnknownYear(year))
    }

    /// Most recent table, if any.
    pub fn latest(&self) -> Option<Arc<RateTable>> {
        self.tables.values().next_back().cloned()
    }

    /// Years with a table, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.tables.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
