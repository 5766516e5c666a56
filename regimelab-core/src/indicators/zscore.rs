//! Rolling z-score: (value - rolling mean) / rolling sample std.
//!
//! Lookback: period - 1. A zero (or non-finite) standard deviation makes the
//! z-score undefined at that row rather than infinite.

use super::{RollingStd, Sma};
use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct ZScore {
    period: usize,
    mean: Sma,
    std: RollingStd,
    name: String,
}

impl ZScore {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            mean: Sma::new(period),
            std: RollingStd::new(period),
            name: format!("zscore_{period}"),
        }
    }

    /// Name of the rolling mean column this indicator derives from.
    pub fn mean_name(&self) -> &str {
        self.mean.name()
    }

    /// Name of the rolling std column this indicator derives from.
    pub fn std_name(&self) -> &str {
        self.std.name()
    }

    /// z-score from precomputed rolling mean and std columns.
    pub fn from_parts(values: &[f64], mean: &[f64], std: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(mean)
            .zip(std)
            .map(|((&v, &m), &s)| {
                if s.is_finite() && s > 0.0 {
                    (v - m) / s
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}

impl Indicator for ZScore {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let mean = self.mean.compute(values);
        let std = self.std.compute(values);
        Self::from_parts(values, &mean, &std)
    }
}
