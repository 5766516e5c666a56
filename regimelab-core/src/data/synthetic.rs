//! Deterministic synthetic price and volatility series.
//!
//! Developer-only demo data. The two series are generated together so the
//! volatility level reacts to price shocks the way an implied-volatility
//! index does: it jumps on down days and decays back toward its mean.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use super::align::SeriesRole;
use super::provider::{DataError, DataSource, SeriesProvider};
use crate::domain::DatedValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub start: NaiveDate,
    /// Number of trading days (weekdays) to generate.
    pub trading_days: usize,
    pub seed: u64,
    pub initial_price: f64,
    /// Long-run mean of the volatility level.
    pub vol_mean: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2015, 1, 2).unwrap_or_default(),
            trading_days: 2520,
            seed: 42,
            initial_price: 2000.0,
            vol_mean: 18.0,
        }
    }
}

impl SyntheticConfig {
    /// Generate the (price, volatility) pair of series.
    pub fn generate(&self) -> (Vec<DatedValue>, Vec<DatedValue>) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut prices = Vec::with_capacity(self.trading_days);
        let mut vols = Vec::with_capacity(self.trading_days);

        let mut price = self.initial_price;
        let mut vol = self.vol_mean;
        let mut date = self.start;

        while prices.len() < self.trading_days {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                date += chrono::Duration::days(1);
                continue;
            }

            // Daily sigma scales with the current volatility level (annualized %)
            let sigma = vol / 100.0 / (252.0_f64).sqrt();
            let shock: f64 = StandardNormal.sample(&mut rng);
            let daily_return = 0.0003 + sigma * shock;
            price *= 1.0 + daily_return;

            let reversion = 0.05 * (self.vol_mean - vol);
            let reaction = -40.0 * daily_return.min(0.0) - 5.0 * daily_return.max(0.0);
            let noise_shock: f64 = StandardNormal.sample(&mut rng);
            let noise = 0.6 * noise_shock;
            vol = (vol + reversion + reaction + noise).max(8.0);

            prices.push(DatedValue::new(date, price));
            vols.push(DatedValue::new(date, vol));
            date += chrono::Duration::days(1);
        }

        (prices, vols)
    }
}

/// Serves one side of a synthetic pair through the `SeriesProvider` trait.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    config: SyntheticConfig,
    role: SeriesRole,
    name: String,
}

impl SyntheticProvider {
    pub fn new(config: SyntheticConfig, role: SeriesRole) -> Self {
        let name = match role {
            SeriesRole::Price => format!("synthetic_price_{}", config.seed),
            SeriesRole::Volatility => format!("synthetic_vol_{}", config.seed),
        };
        Self { config, role, name }
    }
}

impl SeriesProvider for SyntheticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn load(&self) -> Result<Vec<DatedValue>, DataError> {
        let (prices, vols) = self.config.generate();
        Ok(match self.role {
            SeriesRole::Price => prices,
            SeriesRole::Volatility => vols,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_weekdays_only() {
        let config = SyntheticConfig {
            trading_days: 30,
            ..SyntheticConfig::default()
        };
        let (prices, vols) = config.generate();
        assert_eq!(prices.len(), 30);
        assert_eq!(vols.len(), 30);
        for p in &prices {
            assert!(!matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn same_seed_same_series() {
        let config = SyntheticConfig {
            trading_days: 100,
            ..SyntheticConfig::default()
        };
        assert_eq!(config.generate(), config.generate());
    }

    #[test]
    fn values_stay_positive() {
        let (prices, vols) = SyntheticConfig::default().generate();
        assert!(prices.iter().all(|p| p.value > 0.0));
        assert!(vols.iter().all(|v| v.value >= 8.0));
    }

    #[test]
    fn price_shocks_are_standard_normal() {
        let config = SyntheticConfig::default();
        let (prices, vols) = config.generate();

        // Recover each day's shock from the return and the prior vol level
        let mut prev_price = config.initial_price;
        let mut prev_vol = config.vol_mean;
        let shocks: Vec<f64> = prices
            .iter()
            .zip(&vols)
            .map(|(p, v)| {
                let sigma = prev_vol / 100.0 / 252.0_f64.sqrt();
                let shock = (p.value / prev_price - 1.0 - 0.0003) / sigma;
                prev_price = p.value;
                prev_vol = v.value;
                shock
            })
            .collect();

        let n = shocks.len() as f64;
        let mean = shocks.iter().sum::<f64>() / n;
        let var = shocks.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!(mean.abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 1.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn providers_share_dates() {
        let config = SyntheticConfig {
            trading_days: 50,
            ..SyntheticConfig::default()
        };
        let p = SyntheticProvider::new(config.clone(), SeriesRole::Price).load().unwrap();
        let v = SyntheticProvider::new(config, SeriesRole::Volatility).load().unwrap();
        let pd: Vec<_> = p.iter().map(|x| x.date).collect();
        let vd: Vec<_> = v.iter().map(|x| x.date).collect();
        assert_eq!(pd, vd);
    }
}
