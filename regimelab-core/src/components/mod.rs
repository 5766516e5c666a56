//! Strategy components: indicators, signal generation, volatility regime, composition.
//!
//! Every component is a pure function of the aligned series. Nothing holds
//! state across calls, so a run is reproducible from its inputs alone.

pub mod composer;
pub mod indicator;
pub mod regime;
pub mod signal;

pub use composer::{
    lagged_returns, market_returns, ComposedPortfolio, EvaluationFrame, PortfolioComposer,
};
pub use indicator::{DerivedColumns, Indicator};
pub use regime::{ExposureMap, RegimeParams, VolatilityRegimeClassifier};
pub use signal::{MomentumRsiParams, MomentumRsiSignal, SignalGenerator};
