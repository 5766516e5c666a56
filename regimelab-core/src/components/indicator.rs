//! Indicator trait and the named derived-column container.
//!
//! Indicators are pure functions: a value series in, a same-length series out.
//! Undefined outputs are `f64::NAN`. They are computed once per run over the
//! whole aligned series, never recomputed row by row.

use std::collections::BTreeMap;

/// Trait for rolling indicators over a single value series.
///
/// # Warm-up contract
/// `compute` returns a `Vec<f64>` the same length as its input whose first
/// `lookback()` entries are `f64::NAN`. Every later entry is defined unless a
/// NaN input falls inside its window.
///
/// # Look-ahead contamination guard
/// No output at index t may depend on input at index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_10", "rsi_14"). Used as the column key.
    fn name(&self) -> &str;

    /// Number of leading undefined outputs.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the entire series.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Named same-length derived columns attached to an aligned series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedColumns {
    len: usize,
    columns: BTreeMap<String, Vec<f64>>,
}

impl DerivedColumns {
    /// Empty container for series of `len` rows.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: BTreeMap::new(),
        }
    }

    /// Insert a named column.
    ///
    /// # Panics
    /// If `values.len()` differs from the container's row count.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        assert_eq!(
            values.len(),
            self.len,
            "derived column '{name}' has {} rows, expected {}",
            values.len(),
            self.len
        );
        self.columns.insert(name, values);
    }

    /// Compute an indicator over `input` and store it under the indicator's name.
    pub fn insert_indicator(&mut self, indicator: &dyn Indicator, input: &[f64]) {
        self.insert(indicator.name().to_string(), indicator.compute(input));
    }

    /// Value at a row; `None` if the column or row does not exist.
    pub fn get(&self, name: &str, row: usize) -> Option<f64> {
        self.columns.get(name).and_then(|v| v.get(row).copied())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Number of stored columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True if the row is defined (not NaN) in every one of `names`.
    ///
    /// A missing column counts as undefined.
    pub fn row_defined(&self, names: &[&str], row: usize) -> bool {
        names
            .iter()
            .all(|name| self.get(name, row).is_some_and(|v| !v.is_nan()))
    }
}
