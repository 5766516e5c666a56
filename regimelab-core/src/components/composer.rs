//! Portfolio composition: positions, lagged returns, trimming.
//!
//! Positions per variant:
//! - Price Only:  position = signal (0 or 1)
//! - Price + VIX: position = signal × regime exposure
//! - Buy & Hold:  the market return itself
//!
//! Strategy return at t uses the position decided at t-1:
//! `ret[t] = position[t-1] * (price[t] / price[t-1] - 1)`.
//! Information from the close at t only ever affects returns from t+1 on.
//!
//! Trimming then drops every row where any column the evaluation reads is
//! undefined, wherever that row sits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::components::indicator::DerivedColumns;
use crate::components::regime::VolatilityRegimeClassifier;
use crate::components::signal::{MomentumRsiSignal, SignalGenerator};
use crate::domain::{AlignedSeries, PortfolioVariant, Signal, VolRegime};

pub const MARKET_RETURN: &str = "market_return";
pub const POSITION_PRICE: &str = "position_price";
pub const POSITION_PRICE_VIX: &str = "position_price_vix";
pub const RET_PRICE: &str = "ret_price";
pub const RET_PRICE_VIX: &str = "ret_price_vix";

/// Simple returns `p[t]/p[t-1] - 1`; undefined at index 0.
pub fn market_returns(prices: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; prices.len()];
    for i in 1..prices.len() {
        result[i] = prices[i] / prices[i - 1] - 1.0;
    }
    result
}

/// `position[t-1] * market[t]`; undefined at index 0 or where either input is.
pub fn lagged_returns(positions: &[f64], market: &[f64]) -> Vec<f64> {
    debug_assert_eq!(positions.len(), market.len());
    let mut result = vec![f64::NAN; market.len()];
    for t in 1..market.len() {
        let prev = positions[t - 1];
        let m = market[t];
        if !prev.is_nan() && !m.is_nan() {
            result[t] = prev * m;
        }
    }
    result
}

/// Every derived column over the full aligned series, before trimming.
#[derive(Debug, Clone)]
pub struct ComposedPortfolio {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    pub vols: Vec<f64>,
    pub signals: Vec<Option<Signal>>,
    pub regimes: Vec<Option<VolRegime>>,
    pub columns: DerivedColumns,
    /// Column key of the volatility z-score.
    pub zscore_column: String,
    /// Column names a row must have defined to survive trimming.
    pub required: Vec<String>,
}

impl ComposedPortfolio {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn column(&self, name: &str) -> &[f64] {
        self.columns.column(name).unwrap_or(&[])
    }

    /// Drop every row with an undefined required value.
    pub fn trim(&self) -> EvaluationFrame {
        let required: Vec<&str> = self.required.iter().map(|s| s.as_str()).collect();
        let mut frame = EvaluationFrame {
            aligned_rows: self.len(),
            ..EvaluationFrame::default()
        };

        for row in 0..self.len() {
            if !self.columns.row_defined(&required, row) {
                continue;
            }
            let (Some(signal), Some(regime)) = (self.signals[row], self.regimes[row]) else {
                continue;
            };
            frame.dates.push(self.dates[row]);
            frame.prices.push(self.prices[row]);
            frame.vols.push(self.vols[row]);
            frame.signals.push(signal);
            frame.regimes.push(regime);
            frame.zscores.push(self.column(&self.zscore_column)[row]);
            frame.position_price.push(self.column(POSITION_PRICE)[row]);
            frame.position_price_vix.push(self.column(POSITION_PRICE_VIX)[row]);
            frame.market_returns.push(self.column(MARKET_RETURN)[row]);
            frame.ret_price.push(self.column(RET_PRICE)[row]);
            frame.ret_price_vix.push(self.column(RET_PRICE_VIX)[row]);
        }

        frame
    }
}

/// The trimmed, fully defined table the performance evaluator consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationFrame {
    /// Rows in the aligned series before trimming.
    pub aligned_rows: usize,
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    pub vols: Vec<f64>,
    pub zscores: Vec<f64>,
    pub signals: Vec<Signal>,
    pub regimes: Vec<VolRegime>,
    pub position_price: Vec<f64>,
    pub position_price_vix: Vec<f64>,
    pub market_returns: Vec<f64>,
    pub ret_price: Vec<f64>,
    pub ret_price_vix: Vec<f64>,
}

impl EvaluationFrame {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Rows removed by trimming.
    pub fn trimmed_rows(&self) -> usize {
        self.aligned_rows - self.len()
    }

    /// Return series evaluated for a variant.
    pub fn returns(&self, variant: PortfolioVariant) -> &[f64] {
        match variant {
            PortfolioVariant::PriceOnly => &self.ret_price,
            PortfolioVariant::PriceVix => &self.ret_price_vix,
            PortfolioVariant::BuyAndHold => &self.market_returns,
        }
    }

    /// Growth of $1 for a variant: running product of (1 + r).
    pub fn cumulative(&self, variant: PortfolioVariant) -> Vec<f64> {
        self.returns(variant)
            .iter()
            .scan(1.0, |acc, r| {
                *acc *= 1.0 + r;
                Some(*acc)
            })
            .collect()
    }

    /// Rows spent in each regime, in `VolRegime::ALL` order.
    pub fn regime_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for regime in &self.regimes {
            match regime {
                VolRegime::Low => counts[0] += 1,
                VolRegime::Medium => counts[1] += 1,
                VolRegime::High => counts[2] += 1,
            }
        }
        counts
    }

    /// Fraction of rows where the signal is long.
    pub fn long_fraction(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.signals.iter().filter(|s| s.is_long()).count() as f64 / self.len() as f64
    }
}

/// Wires the signal generator and regime classifier over an aligned series.
pub struct PortfolioComposer {
    signal: Box<dyn SignalGenerator>,
    classifier: VolatilityRegimeClassifier,
}

impl PortfolioComposer {
    pub fn new(signal: Box<dyn SignalGenerator>, classifier: VolatilityRegimeClassifier) -> Self {
        Self { signal, classifier }
    }

    pub fn signal_name(&self) -> &str {
        self.signal.name()
    }

    /// Build every derived column over the full series.
    pub fn compose(&self, series: &AlignedSeries) -> ComposedPortfolio {
        let prices = series.prices();
        let vols = series.vols();
        let n = prices.len();
        let mut columns = DerivedColumns::new(n);

        let signals = self.signal.generate(&prices, &mut columns);
        let regimes = self.classifier.classify_series(&vols, &mut columns);

        let position_price: Vec<f64> = signals
            .iter()
            .map(|s| s.map_or(f64::NAN, Signal::position))
            .collect();
        let position_price_vix: Vec<f64> = signals
            .iter()
            .zip(&regimes)
            .map(|(s, r)| match (s, r) {
                (Some(s), Some(r)) => s.position() * self.classifier.exposure(*r),
                _ => f64::NAN,
            })
            .collect();

        let market = market_returns(&prices);
        let ret_price = lagged_returns(&position_price, &market);
        let ret_price_vix = lagged_returns(&position_price_vix, &market);

        let mut required: Vec<String> = self
            .signal
            .indicators()
            .iter()
            .map(|ind| ind.name().to_string())
            .collect();
        required.push(self.classifier.zscore_name().to_string());
        required.extend([MARKET_RETURN, RET_PRICE, RET_PRICE_VIX].map(String::from));

        columns.insert(POSITION_PRICE, position_price);
        columns.insert(POSITION_PRICE_VIX, position_price_vix);
        columns.insert(MARKET_RETURN, market);
        columns.insert(RET_PRICE, ret_price);
        columns.insert(RET_PRICE_VIX, ret_price_vix);

        ComposedPortfolio {
            dates: series.dates(),
            prices,
            vols,
            signals,
            regimes,
            columns,
            zscore_column: self.classifier.zscore_name().to_string(),
            required,
        }
    }

    /// Compose and trim in one step.
    pub fn evaluate(&self, series: &AlignedSeries) -> EvaluationFrame {
        self.compose(series).trim()
    }
}

impl Default for PortfolioComposer {
    fn default() -> Self {
        Self::new(
            Box::new(MomentumRsiSignal::default()),
            VolatilityRegimeClassifier::default(),
        )
    }
}
