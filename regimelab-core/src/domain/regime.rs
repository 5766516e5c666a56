//! Volatility regime and its exposure multiplier.

use serde::{Deserialize, Serialize};

/// Volatility regime derived from the rolling z-score of the volatility proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolRegime {
    /// Volatility below its recent mean.
    Low,
    /// Up to one standard deviation above the mean.
    Medium,
    /// One standard deviation or more above the mean.
    High,
}

impl VolRegime {
    pub const ALL: [VolRegime; 3] = [VolRegime::Low, VolRegime::Medium, VolRegime::High];

    pub fn label(self) -> &'static str {
        match self {
            VolRegime::Low => "low",
            VolRegime::Medium => "medium",
            VolRegime::High => "high",
        }
    }
}

impl std::fmt::Display for VolRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
