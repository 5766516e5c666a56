//! Serializable run configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config
//! and a partial one overrides only what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regimelab_core::components::{ExposureMap, MomentumRsiParams, RegimeParams};

use crate::metrics::TRADING_DAYS_PER_YEAR;

/// Unique identifier for a configuration (content-addressable hash).
pub type ConfigHash = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for one backtest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub strategy: MomentumRsiParams,
    pub regime: RegimeConfig,
    pub evaluation: EvaluationConfig,
    pub input: InputConfig,
}

/// Regime classifier settings, exposures flattened into the `[regime]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    pub window: usize,
    pub medium_threshold: f64,
    pub high_threshold: f64,
    pub low_exposure: f64,
    pub medium_exposure: f64,
    pub high_exposure: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self::from_params(&RegimeParams::default())
    }
}

impl RegimeConfig {
    pub fn from_params(params: &RegimeParams) -> Self {
        Self {
            window: params.window,
            medium_threshold: params.medium_threshold,
            high_threshold: params.high_threshold,
            low_exposure: params.exposures.low,
            medium_exposure: params.exposures.medium,
            high_exposure: params.exposures.high,
        }
    }

    pub fn to_params(&self) -> RegimeParams {
        RegimeParams {
            window: self.window,
            medium_threshold: self.medium_threshold,
            high_threshold: self.high_threshold,
            exposures: ExposureMap {
                low: self.low_exposure,
                medium: self.medium_exposure,
                high: self.high_exposure,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub periods_per_year: u32,
    /// Decimal places in the results table and CSV.
    pub round_decimals: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
            round_decimals: 4,
        }
    }
}

/// Per-file read settings, `[input.price]` and `[input.vol]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub price: SeriesInputConfig,
    pub vol: SeriesInputConfig,
}

/// How one tabular input file is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesInputConfig {
    pub date_column: String,
    pub value_column: String,
    /// chrono `strftime` format of the date column.
    pub date_format: String,
}

impl Default for SeriesInputConfig {
    fn default() -> Self {
        Self {
            date_column: "Date".into(),
            value_column: "Close".into(),
            date_format: "%Y-%m-%d".into(),
        }
    }
}

impl RunConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.strategy;
        if s.ma_short == 0 || s.ma_long == 0 || s.rsi_period == 0 {
            return Err(ConfigError::Invalid(
                "strategy windows must be >= 1".into(),
            ));
        }
        if s.ma_short >= s.ma_long {
            return Err(ConfigError::Invalid(format!(
                "ma_short ({}) must be less than ma_long ({})",
                s.ma_short, s.ma_long
            )));
        }
        if !(0.0..=100.0).contains(&s.rsi_lower)
            || !(0.0..=100.0).contains(&s.rsi_upper)
            || s.rsi_lower >= s.rsi_upper
        {
            return Err(ConfigError::Invalid(format!(
                "RSI band must satisfy 0 <= lower < upper <= 100, got [{}, {}]",
                s.rsi_lower, s.rsi_upper
            )));
        }

        let r = &self.regime;
        // The rolling std needs two observations to be defined.
        if r.window < 2 {
            return Err(ConfigError::Invalid(format!(
                "regime window must be >= 2, got {}",
                r.window
            )));
        }
        if !r.medium_threshold.is_finite()
            || !r.high_threshold.is_finite()
            || r.medium_threshold >= r.high_threshold
        {
            return Err(ConfigError::Invalid(format!(
                "medium_threshold ({}) must be less than high_threshold ({})",
                r.medium_threshold, r.high_threshold
            )));
        }
        for (name, value) in [
            ("low_exposure", r.low_exposure),
            ("medium_exposure", r.medium_exposure),
            ("high_exposure", r.high_exposure),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.evaluation.periods_per_year == 0 {
            return Err(ConfigError::Invalid("periods_per_year must be >= 1".into()));
        }
        for (name, input) in [("price", &self.input.price), ("vol", &self.input.vol)] {
            if input.date_column.is_empty() || input.value_column.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "input.{name} column names must be non-empty"
                )));
            }
        }
        Ok(())
    }

    /// BLAKE3 over the canonical JSON form. Identical configs share a hash.
    pub fn config_hash(&self) -> ConfigHash {
        // Derived Serialize over plain structs and finite defaults cannot fail;
        // fall back to the Debug form rather than panicking.
        let canonical = serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}
