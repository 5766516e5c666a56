//! Concrete indicator implementations.
//!
//! All indicators implement the `Indicator` trait from `components::indicator`
//! and operate on a plain `&[f64]` column of the aligned series.

pub mod rolling_std;
pub mod rsi;
pub mod sma;
pub mod zscore;

pub use rolling_std::RollingStd;
pub use rsi::Rsi;
pub use sma::Sma;
pub use zscore::ZScore;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
