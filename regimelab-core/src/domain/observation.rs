//! Observation: one aligned row of equity price and volatility level.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a single source series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

impl DatedValue {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Equity close and volatility index level for a single date present in both sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
    pub vol: f64,
}

/// Observations sorted ascending by date with no duplicates.
///
/// Construct through `data::align::align_series` or `AlignedSeries::from_sorted`,
/// both of which enforce the ordering invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    observations: Vec<Observation>,
}

impl AlignedSeries {
    /// Build from observations that are already strictly increasing by date.
    ///
    /// Returns `None` if any date is not strictly greater than its predecessor.
    pub fn from_sorted(observations: Vec<Observation>) -> Option<Self> {
        let ordered = observations.windows(2).all(|w| w[0].date < w[1].date);
        ordered.then_some(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.price).collect()
    }

    pub fn vols(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.vol).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// BLAKE3 hash over the serialized observations, used to fingerprint a run's input.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for obs in &self.observations {
            hasher.update(obs.date.to_string().as_bytes());
            hasher.update(&obs.price.to_le_bytes());
            hasher.update(&obs.vol.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(day: u32, price: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
            vol: 15.0,
        }
    }

    #[test]
    fn from_sorted_accepts_increasing_dates() {
        let series = AlignedSeries::from_sorted(vec![obs(2, 100.0), obs(3, 101.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.prices(), vec![100.0, 101.0]);
    }

    #[test]
    fn from_sorted_rejects_duplicates_and_disorder() {
        assert!(AlignedSeries::from_sorted(vec![obs(2, 100.0), obs(2, 101.0)]).is_none());
        assert!(AlignedSeries::from_sorted(vec![obs(3, 100.0), obs(2, 101.0)]).is_none());
    }

    #[test]
    fn dataset_hash_is_deterministic_and_content_sensitive() {
        let a = AlignedSeries::from_sorted(vec![obs(2, 100.0), obs(3, 101.0)]).unwrap();
        let b = AlignedSeries::from_sorted(vec![obs(2, 100.0), obs(3, 101.5)]).unwrap();
        assert_eq!(a.dataset_hash(), a.clone().dataset_hash());
        assert_ne!(a.dataset_hash(), b.dataset_hash());
    }

    #[test]
    fn aligned_series_serialization_roundtrip() {
        let series = AlignedSeries::from_sorted(vec![obs(2, 100.0), obs(3, 101.0)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        let back: AlignedSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(series, back);
    }

    #[test]
    fn empty_series() {
        let series = AlignedSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
    }
}
