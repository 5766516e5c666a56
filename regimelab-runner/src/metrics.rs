//! Performance metrics as pure functions over a per-period return series.
//!
//! Conventions:
//! - simple (not log) returns
//! - sample standard deviation (n - 1) for volatility
//! - Sharpe = annualized return / annualized volatility, no risk-free rate
//! - max drawdown is a non-positive fraction (-0.15 = 15% below the peak)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trading periods per year for daily data.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("return series is empty")]
    EmptyReturns,

    #[error("non-finite return {value} at index {index}")]
    NonFiniteReturn { index: usize, value: f64 },

    #[error("periods_per_year must be >= 1")]
    InvalidPeriodsPerYear,
}

/// Summary statistics for one return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_vol: f64,
    /// `None` when annualized volatility is zero.
    pub sharpe: Option<f64>,
    pub max_drawdown: f64,
    pub periods: usize,
}

/// Compute the summary for `returns` sampled `periods_per_year` times a year.
pub fn performance_metrics(
    returns: &[f64],
    periods_per_year: u32,
) -> Result<PerformanceSummary, MetricsError> {
    if periods_per_year == 0 {
        return Err(MetricsError::InvalidPeriodsPerYear);
    }
    if returns.is_empty() {
        return Err(MetricsError::EmptyReturns);
    }
    if let Some((index, &value)) = returns.iter().enumerate().find(|(_, r)| !r.is_finite()) {
        return Err(MetricsError::NonFiniteReturn { index, value });
    }

    let cumulative = cumulative_returns(returns);
    let final_value = cumulative[cumulative.len() - 1];
    let annualized_return = annualized_return(final_value, returns.len(), periods_per_year);
    let annualized_vol = annualized_volatility(returns, periods_per_year);

    Ok(PerformanceSummary {
        total_return: final_value - 1.0,
        annualized_return,
        annualized_vol,
        sharpe: sharpe_ratio(annualized_return, annualized_vol),
        max_drawdown: max_drawdown(&cumulative),
        periods: returns.len(),
    })
}

// ─── Individual metric functions ────────────────────────────────────

/// Growth of 1 unit: running product of (1 + r).
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |acc, r| {
            *acc *= 1.0 + r;
            Some(*acc)
        })
        .collect()
}

/// `final_value^(periods_per_year / periods) - 1`.
///
/// A wiped-out or negative final value has no real root for fractional
/// exponents; it is reported as a total loss (-1.0).
pub fn annualized_return(final_value: f64, periods: usize, periods_per_year: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    if final_value <= 0.0 {
        return -1.0;
    }
    final_value.powf(periods_per_year as f64 / periods as f64) - 1.0
}

/// Sample standard deviation scaled by sqrt(periods_per_year).
///
/// Fewer than two returns carry no dispersion information; volatility is 0.
pub fn annualized_volatility(returns: &[f64], periods_per_year: u32) -> f64 {
    std_dev(returns) * (periods_per_year as f64).sqrt()
}

/// Annualized return over annualized volatility; `None` on zero volatility.
pub fn sharpe_ratio(annualized_return: f64, annualized_vol: f64) -> Option<f64> {
    if annualized_vol == 0.0 {
        return None;
    }
    Some(annualized_return / annualized_vol)
}

/// Drawdown from the running peak at each point.
pub fn drawdown_series(cumulative: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    cumulative
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            if peak > 0.0 {
                value / peak - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Worst drawdown; 0.0 for a non-decreasing curve.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    drawdown_series(cumulative).into_iter().fold(0.0, f64::min)
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 || values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }
    // Corrected two-pass: the second term cancels rounding error in the mean.
    let n = values.len() as f64;
    let mean = mean_f64(values);
    let (sum_sq, sum) = values.iter().fold((0.0, 0.0), |(sq, s), v| {
        let d = v - mean;
        (sq + d * d, s + d)
    });
    let variance = (sum_sq - sum * sum / n) / (n - 1.0);
    variance.max(0.0).sqrt()
}
