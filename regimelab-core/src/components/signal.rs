//! Signal generation: moving-average trend confirmed by an RSI band.
//!
//! `Long` iff MA_short > MA_long AND rsi_lower < RSI < rsi_upper, else `Flat`.
//! All comparisons are strict, so equal moving averages or an RSI sitting
//! exactly on a band edge produce `Flat`. If any constituent is undefined the
//! signal is undefined (`None`).

use serde::{Deserialize, Serialize};

use crate::components::indicator::{DerivedColumns, Indicator};
use crate::domain::Signal;
use crate::indicators::{Rsi, Sma};

/// Trait for signal generators.
///
/// A generator declares the indicators it reads and evaluates one row at a
/// time from precomputed columns. It never sees positions or returns, so it
/// cannot condition on realized performance.
pub trait SignalGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Indicators over the price column this generator reads.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Signal at `row`, or `None` where any input is undefined.
    fn evaluate(&self, columns: &DerivedColumns, row: usize) -> Option<Signal>;

    /// Compute required indicators into `columns` and evaluate every row.
    fn generate(&self, prices: &[f64], columns: &mut DerivedColumns) -> Vec<Option<Signal>> {
        for indicator in self.indicators() {
            columns.insert_indicator(indicator.as_ref(), prices);
        }
        (0..prices.len()).map(|row| self.evaluate(columns, row)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumRsiParams {
    pub ma_short: usize,
    pub ma_long: usize,
    pub rsi_period: usize,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
}

impl Default for MomentumRsiParams {
    fn default() -> Self {
        Self {
            ma_short: 10,
            ma_long: 30,
            rsi_period: 14,
            rsi_lower: 30.0,
            rsi_upper: 70.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MomentumRsiSignal {
    params: MomentumRsiParams,
    short: Sma,
    long: Sma,
    rsi: Rsi,
}

impl MomentumRsiSignal {
    pub fn new(params: MomentumRsiParams) -> Self {
        Self {
            short: Sma::new(params.ma_short),
            long: Sma::new(params.ma_long),
            rsi: Rsi::new(params.rsi_period),
            params,
        }
    }

    /// The rule itself, on raw indicator values.
    pub fn decide(&self, ma_short: f64, ma_long: f64, rsi: f64) -> Option<Signal> {
        if ma_short.is_nan() || ma_long.is_nan() || rsi.is_nan() {
            return None;
        }
        let trending = ma_short > ma_long;
        let in_band = rsi > self.params.rsi_lower && rsi < self.params.rsi_upper;
        Some(Signal::from(trending && in_band))
    }

    /// Rows before this index are always undefined.
    pub fn warmup(&self) -> usize {
        self.short
            .lookback()
            .max(self.long.lookback())
            .max(self.rsi.lookback())
    }
}

impl Default for MomentumRsiSignal {
    fn default() -> Self {
        Self::new(MomentumRsiParams::default())
    }
}

impl SignalGenerator for MomentumRsiSignal {
    fn name(&self) -> &str {
        "momentum_rsi"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(self.short.clone()),
            Box::new(self.long.clone()),
            Box::new(self.rsi.clone()),
        ]
    }

    fn evaluate(&self, columns: &DerivedColumns, row: usize) -> Option<Signal> {
        let ma_short = columns.get(self.short.name(), row)?;
        let ma_long = columns.get(self.long.name(), row)?;
        let rsi = columns.get(self.rsi.name(), row)?;
        self.decide(ma_short, ma_long, rsi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_when_trending_and_rsi_mid_band() {
        let s = MomentumRsiSignal::default();
        assert_eq!(s.decide(101.0, 100.0, 50.0), Some(Signal::Long));
    }

    #[test]
    fn rsi_band_edges_are_exclusive() {
        let s = MomentumRsiSignal::default();
        assert_eq!(s.decide(101.0, 100.0, 70.0), Some(Signal::Flat));
        assert_eq!(s.decide(101.0, 100.0, 30.0), Some(Signal::Flat));
        assert_eq!(s.decide(101.0, 100.0, 69.999), Some(Signal::Long));
        assert_eq!(s.decide(101.0, 100.0, 30.001), Some(Signal::Long));
    }

    #[test]
    fn equal_moving_averages_are_flat() {
        let s = MomentumRsiSignal::default();
        assert_eq!(s.decide(100.0, 100.0, 50.0), Some(Signal::Flat));
        assert_eq!(s.decide(99.0, 100.0, 50.0), Some(Signal::Flat));
    }

    #[test]
    fn undefined_constituent_is_undefined_signal() {
        let s = MomentumRsiSignal::default();
        assert_eq!(s.decide(f64::NAN, 100.0, 50.0), None);
        assert_eq!(s.decide(101.0, f64::NAN, 50.0), None);
        assert_eq!(s.decide(101.0, 100.0, f64::NAN), None);
    }

    #[test]
    fn evaluate_reads_named_columns() {
        let s = MomentumRsiSignal::default();
        let mut cols = DerivedColumns::new(2);
        cols.insert("sma_10", vec![f64::NAN, 105.0]);
        cols.insert("sma_30", vec![f64::NAN, 100.0]);
        cols.insert("rsi_14", vec![f64::NAN, 55.0]);
        assert_eq!(s.evaluate(&cols, 0), None);
        assert_eq!(s.evaluate(&cols, 1), Some(Signal::Long));
    }

    #[test]
    fn missing_column_is_undefined() {
        let s = MomentumRsiSignal::default();
        let cols = DerivedColumns::new(1);
        assert_eq!(s.evaluate(&cols, 0), None);
    }

    #[test]
    fn generate_warmup_matches_longest_lookback() {
        let s = MomentumRsiSignal::default();
        let prices: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let mut cols = DerivedColumns::new(prices.len());
        let signals = s.generate(&prices, &mut cols);

        assert_eq!(s.warmup(), 29);
        assert!(signals[..29].iter().all(|x| x.is_none()));
        assert!(signals[29..].iter().all(|x| x.is_some()));
        assert_eq!(cols.len(), 3);
    }
}
