//! Volatility regime classifier.
//!
//! Rolling z-score of the volatility proxy, binned into three regimes:
//! - z < medium_threshold                    → Low
//! - medium_threshold ≤ z < high_threshold   → Medium
//! - z ≥ high_threshold                      → High
//!
//! Each regime maps to an exposure multiplier through `ExposureMap`.
//! An undefined z-score (warm-up or zero rolling std) has no regime.

use serde::{Deserialize, Serialize};

use crate::components::indicator::{DerivedColumns, Indicator};
use crate::domain::VolRegime;
use crate::indicators::{RollingStd, Sma, ZScore};

/// Fractional equity exposure per regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureMap {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for ExposureMap {
    fn default() -> Self {
        Self {
            low: 1.0,
            medium: 0.5,
            high: 0.0,
        }
    }
}

impl ExposureMap {
    pub fn exposure(&self, regime: VolRegime) -> f64 {
        match regime {
            VolRegime::Low => self.low,
            VolRegime::Medium => self.medium,
            VolRegime::High => self.high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeParams {
    pub window: usize,
    pub medium_threshold: f64,
    pub high_threshold: f64,
    pub exposures: ExposureMap,
}

impl Default for RegimeParams {
    fn default() -> Self {
        Self {
            window: 60,
            medium_threshold: 0.0,
            high_threshold: 1.0,
            exposures: ExposureMap::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VolatilityRegimeClassifier {
    params: RegimeParams,
    zscore: ZScore,
}

impl VolatilityRegimeClassifier {
    pub fn new(params: RegimeParams) -> Self {
        Self {
            zscore: ZScore::new(params.window),
            params,
        }
    }

    /// Column key under which the z-score is stored.
    pub fn zscore_name(&self) -> &str {
        self.zscore.name()
    }

    pub fn warmup(&self) -> usize {
        self.zscore.lookback()
    }

    /// Bin a single z-score. Bins are tested in ascending order so each
    /// threshold belongs to the higher regime.
    pub fn classify(&self, z: f64) -> Option<VolRegime> {
        if z.is_nan() {
            None
        } else if z < self.params.medium_threshold {
            Some(VolRegime::Low)
        } else if z < self.params.high_threshold {
            Some(VolRegime::Medium)
        } else {
            Some(VolRegime::High)
        }
    }

    pub fn exposure(&self, regime: VolRegime) -> f64 {
        self.params.exposures.exposure(regime)
    }

    /// Exposure for a raw z-score, `None` where the z-score is undefined.
    pub fn exposure_for(&self, z: f64) -> Option<f64> {
        self.classify(z).map(|r| self.exposure(r))
    }

    /// Compute rolling mean, std and z-score of `vols` into `columns` and
    /// classify every row.
    pub fn classify_series(&self, vols: &[f64], columns: &mut DerivedColumns) -> Vec<Option<VolRegime>> {
        let mean_ind = Sma::new(self.params.window);
        let std_ind = RollingStd::new(self.params.window);
        let mean = mean_ind.compute(vols);
        let std = std_ind.compute(vols);
        let z = ZScore::from_parts(vols, &mean, &std);

        let regimes = z.iter().map(|&v| self.classify(v)).collect();

        columns.insert(format!("vol_{}", self.zscore.mean_name()), mean);
        columns.insert(format!("vol_{}", self.zscore.std_name()), std);
        columns.insert(self.zscore.name().to_string(), z);
        regimes
    }
}

impl Default for VolatilityRegimeClassifier {
    fn default() -> Self {
        Self::new(RegimeParams::default())
    }
}
