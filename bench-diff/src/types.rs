//! Core types for the benchmark comparison library
//!
//! A `MeasurementTable` is what the loader produces from one CSV source and what
//! the report generator consumes. Tables are built once, read once and dropped.

use num_bigint::BigInt;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Result type for loader and report operations
pub type Result<T> = std::result::Result<T, BenchDiffError>;

/// One parsed data row of a benchmark results file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRow {
    /// Instruction / benchmark name, trimmed
    pub name: String,
    /// Instrumented measurement (unbounded)
    pub pin: BigInt,
    /// Reference measurement for the same name (unbounded)
    pub native: BigInt,
}

impl MeasurementRow {
    /// Create a new row
    pub fn new(name: impl Into<String>, pin: impl Into<BigInt>, native: impl Into<BigInt>) -> Self {
        Self {
            name: name.into(),
            pin: pin.into(),
            native: native.into(),
        }
    }
}

/// Errors that can occur while loading a table
#[derive(Debug, thiserror::Error)]
pub enum BenchDiffError {
    #[error("Failed to read {source_name}: {error}")]
    Io {
        /// Human readable description of the source (path or "<stdin>")
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    /// Read failure surfaced by the CSV reader after the source was opened
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Measurements keyed by name
///
/// Keys are unique; inserting an existing name replaces its values. Iteration
/// is always in ascending name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementTable {
    entries: BTreeMap<String, (BigInt, BigInt)>,
}

impl MeasurementTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, returning the `(pin, native)` pair it replaced
    pub fn insert(&mut self, row: MeasurementRow) -> Option<(BigInt, BigInt)> {
        self.entries.insert(row.name, (row.pin, row.native))
    }

    /// Look up the `(pin, native)` pair for a name
    pub fn get(&self, name: &str) -> Option<(&BigInt, &BigInt)> {
        self.entries.get(name).map(|(pin, native)| (pin, native))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, (pin, native))` in ascending name order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// All rows in ascending name order
    pub fn rows(&self) -> Vec<MeasurementRow> {
        self.iter()
            .map(|(name, (pin, native))| MeasurementRow::new(name, pin.clone(), native.clone()))
            .collect()
    }
}

/// Sorted iterator over a `MeasurementTable`
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, (BigInt, BigInt)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, (&'a BigInt, &'a BigInt));

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, (pin, native))| (name.as_str(), (pin, native)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a MeasurementTable {
    type Item = (&'a str, (&'a BigInt, &'a BigInt));
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<MeasurementRow> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = MeasurementRow>>(iter: I) -> Self {
        let mut table = MeasurementTable::new();
        for row in iter {
            table.insert(row);
        }
        table
    }
}

impl fmt::Display for MeasurementRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.name, self.pin, self.native)
    }
}
