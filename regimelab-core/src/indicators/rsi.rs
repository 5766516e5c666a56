//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses, matching TA-Lib:
//! - seed: simple mean of the first `period` price changes
//! - then: avg = (avg * (period - 1) + x) / period
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (the first change is only available at index 1).
//! Edge cases: no movement → 50; avg_loss == 0 → 100; avg_gain == 0 → 0.
//! A NaN input invalidates the current value and every later one, since the
//! smoothed averages carry it forward indefinitely.

use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period + 1 {
            return result;
        }

        let change = |i: usize| values[i] - values[i - 1];

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 1..=self.period {
            let ch = change(i);
            if ch.is_nan() {
                return result;
            }
            if ch > 0.0 {
                avg_gain += ch;
            } else {
                avg_loss -= ch;
            }
        }
        let period = self.period as f64;
        avg_gain /= period;
        avg_loss /= period;

        result[self.period] = rsi_from_averages(avg_gain, avg_loss);

        for i in (self.period + 1)..n {
            let ch = change(i);
            if ch.is_nan() {
                return result;
            }
            let gain = ch.max(0.0);
            let loss = (-ch).max(0.0);

            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;

            result[i] = rsi_from_averages(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
