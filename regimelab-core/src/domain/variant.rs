//! Portfolio variants compared in a run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortfolioVariant {
    /// Position = trading signal.
    PriceOnly,
    /// Position = trading signal scaled by the volatility regime exposure.
    PriceVix,
    /// Always fully invested benchmark.
    BuyAndHold,
}

impl PortfolioVariant {
    /// Variants in reporting order.
    pub const ALL: [PortfolioVariant; 3] = [
        PortfolioVariant::PriceOnly,
        PortfolioVariant::PriceVix,
        PortfolioVariant::BuyAndHold,
    ];

    /// Row label used in the results table.
    pub fn label(self) -> &'static str {
        match self {
            PortfolioVariant::PriceOnly => "Price Only",
            PortfolioVariant::PriceVix => "Price + VIX",
            PortfolioVariant::BuyAndHold => "Buy & Hold",
        }
    }

    /// Column-safe identifier used in exported files.
    pub fn key(self) -> &'static str {
        match self {
            PortfolioVariant::PriceOnly => "price_only",
            PortfolioVariant::PriceVix => "price_vix",
            PortfolioVariant::BuyAndHold => "buy_and_hold",
        }
    }
}

impl std::fmt::Display for PortfolioVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
