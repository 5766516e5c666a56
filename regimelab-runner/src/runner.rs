//! Backtest runner: wires loading, alignment, composition and metrics.
//!
//! Two entry points:
//! - `run_from_providers()`: loads both series through providers, then runs. Used by the CLI.
//! - `run_pipeline()`: takes pre-loaded series, no I/O. Used by tests and benches.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, info_span, warn};

use regimelab_core::components::{
    EvaluationFrame, MomentumRsiSignal, PortfolioComposer, VolatilityRegimeClassifier,
};
use regimelab_core::data::{
    align_series, unmatched_counts, AlignError, DataSource, SeriesProvider, SeriesRole,
};
use regimelab_core::domain::{PortfolioVariant, VolRegime};

use crate::config::{ConfigError, RunConfig};
use crate::data_loader::{load_series, LoadError, LoadedSeries};
use crate::fingerprint::RunFingerprint;
use crate::metrics::{performance_metrics, MetricsError, PerformanceSummary};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("alignment error: {0}")]
    Align(#[from] AlignError),

    #[error("price ({price_rows} rows) and volatility ({vol_rows} rows) series share no dates")]
    EmptyIntersection { price_rows: usize, vol_rows: usize },

    #[error(
        "no evaluable rows: {aligned_rows} aligned rows do not cover the {warmup}-row warm-up"
    )]
    NoEvaluableRows { aligned_rows: usize, warmup: usize },

    #[error("metrics for {variant}: {source}")]
    Metrics {
        variant: PortfolioVariant,
        source: MetricsError,
    },
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Metrics for one portfolio variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantResult {
    pub variant: PortfolioVariant,
    pub summary: PerformanceSummary,
}

/// Where each input series came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputProvenance {
    pub price_name: String,
    pub price_source: DataSource,
    pub vol_name: String,
    pub vol_source: DataSource,
}

impl InputProvenance {
    pub fn has_synthetic(&self) -> bool {
        self.price_source == DataSource::Synthetic || self.vol_source == DataSource::Synthetic
    }
}

/// Rows spent in each volatility regime over the evaluation window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RegimeCounts {
    pub fn get(&self, regime: VolRegime) -> usize {
        match regime {
            VolRegime::Low => self.low,
            VolRegime::Medium => self.medium,
            VolRegime::High => self.high,
        }
    }
}

/// Row accounting and occupancy for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub price_rows: usize,
    pub vol_rows: usize,
    /// Price dates with no volatility observation.
    pub unmatched_price: usize,
    /// Volatility dates with no price observation.
    pub unmatched_vol: usize,
    pub aligned_rows: usize,
    pub evaluated_rows: usize,
    pub trimmed_rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub regime_counts: RegimeCounts,
    /// Fraction of evaluated rows with a long signal.
    pub long_fraction: f64,
    pub signal_name: String,
}

/// Growth of $1 per variant over the evaluation window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeCurves {
    pub dates: Vec<NaiveDate>,
    pub price_only: Vec<f64>,
    pub price_vix: Vec<f64>,
    pub buy_and_hold: Vec<f64>,
}

impl CumulativeCurves {
    pub fn from_frame(frame: &EvaluationFrame) -> Self {
        Self {
            dates: frame.dates.clone(),
            price_only: frame.cumulative(PortfolioVariant::PriceOnly),
            price_vix: frame.cumulative(PortfolioVariant::PriceVix),
            buy_and_hold: frame.cumulative(PortfolioVariant::BuyAndHold),
        }
    }

    pub fn curve(&self, variant: PortfolioVariant) -> &[f64] {
        match variant {
            PortfolioVariant::PriceOnly => &self.price_only,
            PortfolioVariant::PriceVix => &self.price_vix,
            PortfolioVariant::BuyAndHold => &self.buy_and_hold,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Complete result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub fingerprint: RunFingerprint,
    pub config: RunConfig,
    pub inputs: InputProvenance,
    pub diagnostics: RunDiagnostics,
    /// One entry per variant, in `PortfolioVariant::ALL` order.
    pub variants: Vec<VariantResult>,
    pub curves: CumulativeCurves,
}

impl RunResult {
    pub fn variant(&self, variant: PortfolioVariant) -> Option<&PerformanceSummary> {
        self.variants
            .iter()
            .find(|v| v.variant == variant)
            .map(|v| &v.summary)
    }
}

/// Load both series through their providers, then run.
pub fn run_from_providers(
    price: &dyn SeriesProvider,
    vol: &dyn SeriesProvider,
    config: &RunConfig,
) -> Result<RunResult, RunError> {
    config.validate()?;
    let price = load_series(price, SeriesRole::Price)?;
    let vol = load_series(vol, SeriesRole::Volatility)?;
    run_pipeline(&price, &vol, config)
}

/// Run the full pipeline over pre-loaded series, no I/O.
pub fn run_pipeline(
    price: &LoadedSeries,
    vol: &LoadedSeries,
    config: &RunConfig,
) -> Result<RunResult, RunError> {
    config.validate()?;
    let config_hash = config.config_hash();
    let span = info_span!("run", config = &config_hash[..12]);
    let _enter = span.enter();

    // Stage 1: align
    let aligned = align_series(&price.values, &vol.values)?;
    let (unmatched_price, unmatched_vol) = unmatched_counts(&price.values, &vol.values);
    if aligned.is_empty() {
        return Err(RunError::EmptyIntersection {
            price_rows: price.values.len(),
            vol_rows: vol.values.len(),
        });
    }
    info!(
        price_rows = price.values.len(),
        vol_rows = vol.values.len(),
        aligned = aligned.len(),
        unmatched_price,
        unmatched_vol,
        "aligned series"
    );

    // Stage 2: signals, regimes, positions and lagged returns
    let signal = MomentumRsiSignal::new(config.strategy.clone());
    let classifier = VolatilityRegimeClassifier::new(config.regime.to_params());
    let warmup = signal.warmup().max(classifier.warmup());
    let composer = PortfolioComposer::new(Box::new(signal), classifier);
    let frame = composer.evaluate(&aligned);

    // Stage 3: trimming happened inside evaluate; guard the remainder
    let (first_date, last_date) = match (frame.dates.first(), frame.dates.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(RunError::NoEvaluableRows {
                aligned_rows: aligned.len(),
                warmup,
            })
        }
    };
    info!(
        evaluated = frame.len(),
        trimmed = frame.trimmed_rows(),
        %first_date,
        %last_date,
        "trimmed undefined rows"
    );

    let [low, medium, high] = frame.regime_counts();
    let regime_counts = RegimeCounts { low, medium, high };
    for regime in VolRegime::ALL {
        if regime_counts.get(regime) == 0 {
            warn!(%regime, "regime never occurs in the evaluation window");
        }
    }

    // Stage 4: metrics per variant
    let variants = evaluate_variants(&frame, config.evaluation.periods_per_year)?;
    for v in &variants {
        info!(
            variant = %v.variant,
            total_return = v.summary.total_return,
            annualized_return = v.summary.annualized_return,
            sharpe = ?v.summary.sharpe,
            max_drawdown = v.summary.max_drawdown,
            "variant evaluated"
        );
    }

    let diagnostics = RunDiagnostics {
        price_rows: price.values.len(),
        vol_rows: vol.values.len(),
        unmatched_price,
        unmatched_vol,
        aligned_rows: aligned.len(),
        evaluated_rows: frame.len(),
        trimmed_rows: frame.trimmed_rows(),
        first_date,
        last_date,
        regime_counts,
        long_fraction: frame.long_fraction(),
        signal_name: composer.signal_name().to_string(),
    };

    Ok(RunResult {
        schema_version: SCHEMA_VERSION,
        fingerprint: RunFingerprint::new(config_hash, aligned.dataset_hash()),
        config: config.clone(),
        inputs: InputProvenance {
            price_name: price.name.clone(),
            price_source: price.source,
            vol_name: vol.name.clone(),
            vol_source: vol.source,
        },
        diagnostics,
        variants,
        curves: CumulativeCurves::from_frame(&frame),
    })
}

/// Evaluate every variant in parallel. Output order follows `PortfolioVariant::ALL`.
pub fn evaluate_variants(
    frame: &EvaluationFrame,
    periods_per_year: u32,
) -> Result<Vec<VariantResult>, RunError> {
    PortfolioVariant::ALL
        .par_iter()
        .map(|&variant| {
            performance_metrics(frame.returns(variant), periods_per_year)
                .map(|summary| VariantResult { variant, summary })
                .map_err(|source| RunError::Metrics { variant, source })
        })
        .collect()
}
