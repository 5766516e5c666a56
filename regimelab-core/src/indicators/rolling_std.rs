//! Rolling sample standard deviation (n - 1 denominator).
//!
//! Lookback: period - 1. Requires period >= 2.

use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct RollingStd {
    period: usize,
    name: String,
}

impl RollingStd {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "rolling std period must be >= 2");
        Self {
            period,
            name: format!("std_{period}"),
        }
    }
}

impl Indicator for RollingStd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        // Corrected two-pass per window; a constant window is exactly zero.
        let p = self.period as f64;
        for end in (self.period - 1)..n {
            let window = &values[end + 1 - self.period..=end];
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }
            if window.iter().all(|v| *v == window[0]) {
                result[end] = 0.0;
                continue;
            }
            let mean = window.iter().sum::<f64>() / p;
            let (ss, s) = window.iter().fold((0.0, 0.0), |(ss, s), v| {
                let d = v - mean;
                (ss + d * d, s + d)
            });
            result[end] = ((ss - s * s / p) / (p - 1.0)).max(0.0).sqrt();
        }

        result
    }
}
