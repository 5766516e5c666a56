//! Two-series time alignment.
//!
//! Inner join of the equity price series and the volatility series on date.
//! Only dates present in both survive; the result is sorted ascending with a
//! contiguous index. Unlike multi-symbol alignment for trading, nothing is
//! filled: a date missing from either side is simply absent.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::domain::{AlignedSeries, DatedValue, Observation};

/// Which input a series plays in the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesRole {
    Price,
    Volatility,
}

impl std::fmt::Display for SeriesRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesRole::Price => f.write_str("price series"),
            SeriesRole::Volatility => f.write_str("volatility series"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AlignError {
    #[error("duplicate date {date} in {role}")]
    DuplicateDate { role: SeriesRole, date: NaiveDate },
}

/// Inner-join `prices` and `vols` on date.
///
/// Duplicate dates within either input are rejected rather than resolved.
/// An empty intersection yields an empty `AlignedSeries`.
pub fn align_series(prices: &[DatedValue], vols: &[DatedValue]) -> Result<AlignedSeries, AlignError> {
    let price_map = index_by_date(prices, SeriesRole::Price)?;
    let vol_map = index_by_date(vols, SeriesRole::Volatility)?;

    let observations: Vec<Observation> = price_map
        .iter()
        .filter_map(|(date, &price)| {
            vol_map.get(date).map(|&vol| Observation {
                date: *date,
                price,
                vol,
            })
        })
        .collect();

    // BTreeMap iteration is ascending and keys are unique
    Ok(AlignedSeries::from_sorted(observations).unwrap_or_default())
}

fn index_by_date(
    series: &[DatedValue],
    role: SeriesRole,
) -> Result<BTreeMap<NaiveDate, f64>, AlignError> {
    let mut map = BTreeMap::new();
    for point in series {
        if map.insert(point.date, point.value).is_some() {
            return Err(AlignError::DuplicateDate {
                role,
                date: point.date,
            });
        }
    }
    Ok(map)
}

/// Count of dates in each input that did not survive the join, for diagnostics.
pub fn unmatched_counts(prices: &[DatedValue], vols: &[DatedValue]) -> (usize, usize) {
    let price_dates: HashSet<NaiveDate> = prices.iter().map(|p| p.date).collect();
    let vol_dates: HashSet<NaiveDate> = vols.iter().map(|v| v.date).collect();
    let price_only = price_dates.difference(&vol_dates).count();
    let vol_only = vol_dates.difference(&price_dates).count();
    (price_only, vol_only)
}
