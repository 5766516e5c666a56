//! End-to-end engine tests on constructed series.
//!
//! The V-shaped price path has a 0.5/row trend with a ±0.75 alternating
//! wiggle. Even-length moving averages cancel the wiggle exactly, so MA10
//! crosses above MA30 at row 163 and back below after row 212: a 50-row
//! long window. The wiggle keeps RSI strictly between 30 and 70.
//!
//! Volatility declines linearly, so its 60-row z-score is a negative
//! constant and every defined row sits in the low regime (exposure 1.0).

use chrono::NaiveDate;
use regimelab_core::components::{EvaluationFrame, PortfolioComposer};
use regimelab_core::data::align_series;
use regimelab_core::domain::{DatedValue, PortfolioVariant, Signal, VolRegime};

const ROWS: usize = 300;

fn trend(t: usize) -> f64 {
    let t = t as f64;
    if t <= 150.0 {
        200.0 - 0.5 * t
    } else if t <= 200.0 {
        125.0 + 0.5 * (t - 150.0)
    } else {
        150.0 - 0.5 * (t - 200.0)
    }
}

fn date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(i as i64)
}

fn scenario_inputs() -> (Vec<DatedValue>, Vec<DatedValue>) {
    let prices = (0..ROWS)
        .map(|t| {
            let wiggle = if t % 2 == 0 { 0.75 } else { -0.75 };
            DatedValue::new(date(t), trend(t) + wiggle)
        })
        .collect();
    let vols = (0..ROWS)
        .map(|t| DatedValue::new(date(t), 40.0 - 0.1 * t as f64))
        .collect();
    (prices, vols)
}

fn scenario_frame() -> EvaluationFrame {
    let (prices, vols) = scenario_inputs();
    let aligned = align_series(&prices, &vols).unwrap();
    PortfolioComposer::default().evaluate(&aligned)
}

#[test]
fn warmup_rows_are_trimmed() {
    let frame = scenario_frame();
    // z-score defined from row 59; returns need the prior row's exposure
    assert_eq!(frame.aligned_rows, ROWS);
    assert_eq!(frame.len(), ROWS - 60);
    assert_eq!(frame.dates[0], date(60));
    assert_eq!(*frame.dates.last().unwrap(), date(ROWS - 1));
}

#[test]
fn low_regime_throughout() {
    let frame = scenario_frame();
    assert!(frame.regimes.iter().all(|r| *r == VolRegime::Low));
    assert!(frame.zscores.iter().all(|z| *z < 0.0));
    assert_eq!(frame.regime_counts(), [frame.len(), 0, 0]);
}

#[test]
fn long_window_is_fifty_rows() {
    let frame = scenario_frame();
    let long_dates: Vec<NaiveDate> = frame
        .dates
        .iter()
        .zip(&frame.signals)
        .filter(|(_, s)| **s == Signal::Long)
        .map(|(d, _)| *d)
        .collect();
    let expected: Vec<NaiveDate> = (163..=212).map(date).collect();
    assert_eq!(long_dates, expected);
}

#[test]
fn variants_match_when_fully_exposed() {
    let frame = scenario_frame();
    assert_eq!(
        frame.returns(PortfolioVariant::PriceOnly),
        frame.returns(PortfolioVariant::PriceVix)
    );
}

#[test]
fn returns_nonzero_only_one_row_after_long_signal() {
    let frame = scenario_frame();
    let nonzero: Vec<NaiveDate> = frame
        .dates
        .iter()
        .zip(&frame.ret_price)
        .filter(|(_, r)| **r != 0.0)
        .map(|(d, _)| *d)
        .collect();
    let expected: Vec<NaiveDate> = (164..=213).map(date).collect();
    assert_eq!(nonzero, expected);
}

#[test]
fn buy_and_hold_is_market_return() {
    let (prices, _) = scenario_inputs();
    let frame = scenario_frame();
    for (date, r) in frame.dates.iter().zip(frame.returns(PortfolioVariant::BuyAndHold)) {
        let idx = prices.iter().position(|p| p.date == *date).unwrap();
        let expected = prices[idx].value / prices[idx - 1].value - 1.0;
        assert!((r - expected).abs() < 1e-12);
    }
}

#[test]
fn composing_twice_is_identical() {
    assert_eq!(scenario_frame(), scenario_frame());
}

#[test]
fn high_volatility_flattens_filtered_variant() {
    let (prices, mut vols) = scenario_inputs();
    // A volatility spike well above its recent range across the long window
    for v in vols.iter_mut().skip(170).take(20) {
        v.value = 80.0;
    }
    let aligned = align_series(&prices, &vols).unwrap();
    let frame = PortfolioComposer::default().evaluate(&aligned);

    let row = frame.dates.iter().position(|d| *d == date(175)).unwrap();
    assert_eq!(frame.regimes[row - 1], VolRegime::High);
    assert_eq!(frame.ret_price_vix[row], 0.0);
    assert_ne!(frame.ret_price[row], 0.0);
}
