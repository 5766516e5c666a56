//! File-to-artifacts runs over constructed CSV inputs.
//!
//! Same construction as the core pipeline scenario: a V-shaped price with a
//! ±0.75 alternating wiggle (long exactly on rows 163..=212) and a linearly
//! declining volatility proxy (low regime everywhere).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regimelab_core::domain::PortfolioVariant;
use regimelab_runner::reporting::{
    read_result_json, COMPARISON_CSV, CUMULATIVE_CSV, CUMULATIVE_PARQUET, REPORT_MARKDOWN,
    RESULT_JSON,
};
use regimelab_runner::{
    provider_for_path, run_from_providers, ArtifactManager, ResultsTable, RunConfig, RunError,
};

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

fn price(t: usize) -> f64 {
    trend(t) + if t % 2 == 0 { 0.75 } else { -0.75 }
}

fn date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(i as i64)
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let mut sp = String::from("Date,Open,Close\n");
    for t in 0..ROWS {
        sp.push_str(&format!("{},0,{}\n", date(t), price(t)));
    }
    // Volatility carries five extra leading dates with no price counterpart.
    let mut vix = String::from("Date,Close\n");
    for t in 0..ROWS + 5 {
        let d = NaiveDate::from_ymd_opt(2019, 12, 27).unwrap() + chrono::Duration::days(t as i64);
        let row = t as i64 - 5;
        vix.push_str(&format!("{},{}\n", d, 40.0 - 0.1 * row as f64));
    }
    let sp_path = dir.join("sp.csv");
    let vix_path = dir.join("vix.csv");
    fs::write(&sp_path, sp).unwrap();
    fs::write(&vix_path, vix).unwrap();
    (sp_path, vix_path)
}

fn run_scenario(dir: &Path) -> regimelab_runner::RunResult {
    let config = RunConfig::default();
    let (sp, vix) = write_inputs(dir);
    let price = provider_for_path(&sp, &config.input.price).unwrap();
    let vol = provider_for_path(&vix, &config.input.vol).unwrap();
    run_from_providers(price.as_ref(), vol.as_ref(), &config).unwrap()
}

#[test]
fn scenario_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_scenario(dir.path());

    let d = &result.diagnostics;
    assert_eq!(d.aligned_rows, ROWS);
    assert_eq!(d.unmatched_vol, 5);
    assert_eq!(d.unmatched_price, 0);
    assert_eq!(d.evaluated_rows, ROWS - 60);
    assert_eq!(d.first_date, date(60));
    assert_eq!(d.regime_counts.low, d.evaluated_rows);
    assert!((d.long_fraction - 50.0 / 240.0).abs() < 1e-12);

    // Low regime everywhere: regime scaling changes nothing.
    let price_only = result.variant(PortfolioVariant::PriceOnly).unwrap();
    let price_vix = result.variant(PortfolioVariant::PriceVix).unwrap();
    assert_eq!(price_only, price_vix);

    // Held from the close of row 163 through the close of row 213.
    let expected: f64 = (164..=213)
        .map(|t| price(t) / price(t - 1))
        .product::<f64>()
        - 1.0;
    assert!((price_only.total_return - expected).abs() < 1e-10);

    let bh = result.variant(PortfolioVariant::BuyAndHold).unwrap();
    let bh_expected = price(ROWS - 1) / price(59) - 1.0;
    assert!((bh.total_return - bh_expected).abs() < 1e-10);
    assert!(bh.max_drawdown < 0.0);
}

#[test]
fn artifacts_written() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_scenario(dir.path());
    let out = dir.path().join("results");
    let paths = ArtifactManager::new(&out).unwrap().save_run(&result).unwrap();

    for name in [COMPARISON_CSV, CUMULATIVE_CSV, CUMULATIVE_PARQUET, REPORT_MARKDOWN, RESULT_JSON] {
        assert!(out.join(name).exists(), "missing {name}");
    }

    let comparison = fs::read_to_string(&paths.comparison_csv).unwrap();
    assert_eq!(comparison, ResultsTable::from_result(&result).to_csv().unwrap());
    let labels: Vec<&str> = comparison
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(labels, vec!["Price Only", "Price + VIX", "Buy & Hold"]);

    let cumulative = fs::read_to_string(&paths.cumulative_csv).unwrap();
    assert_eq!(cumulative.lines().count(), result.diagnostics.evaluated_rows + 1);

    let back = read_result_json(&paths.result_json).unwrap();
    assert_eq!(back.fingerprint, result.fingerprint);
}

#[test]
fn vol_file_read_with_its_own_columns_and_format() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = run_scenario(dir.path());

    let (sp, vix) = write_inputs(dir.path());
    let reformatted: String = fs::read_to_string(&vix)
        .unwrap()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return "DATE,CLOSE\n".to_string();
            }
            let (d, v) = line.split_once(',').unwrap();
            let d = NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
            format!("{},{}\n", d.format("%m/%d/%Y"), v)
        })
        .collect();
    let other_vix = dir.path().join("vix_other.csv");
    fs::write(&other_vix, reformatted).unwrap();

    let mut config = RunConfig::default();
    config.input.vol.date_column = "DATE".into();
    config.input.vol.value_column = "CLOSE".into();
    config.input.vol.date_format = "%m/%d/%Y".into();

    let price = provider_for_path(&sp, &config.input.price).unwrap();
    let vol = provider_for_path(&other_vix, &config.input.vol).unwrap();
    let result = run_from_providers(price.as_ref(), vol.as_ref(), &config).unwrap();

    assert_eq!(result.diagnostics, baseline.diagnostics);
    assert_eq!(result.variants, baseline.variants);
}

#[test]
fn disjoint_inputs_fail_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let sp = dir.path().join("sp.csv");
    let vix = dir.path().join("vix.csv");
    fs::write(&sp, "Date,Close\n2020-01-01,1\n2020-01-02,2\n").unwrap();
    fs::write(&vix, "Date,Close\n2021-01-01,1\n").unwrap();

    let config = RunConfig::default();
    let price = provider_for_path(&sp, &config.input.price).unwrap();
    let vol = provider_for_path(&vix, &config.input.vol).unwrap();
    let err = run_from_providers(price.as_ref(), vol.as_ref(), &config).unwrap_err();
    assert!(matches!(err, RunError::EmptyIntersection { .. }));
}

#[test]
fn unreadable_input_is_load_error() {
    let config = RunConfig::default();
    let price = provider_for_path(Path::new("/nonexistent/sp.csv"), &config.input.price).unwrap();
    let vol = provider_for_path(Path::new("/nonexistent/vix.csv"), &config.input.vol).unwrap();
    let err = run_from_providers(price.as_ref(), vol.as_ref(), &config).unwrap_err();
    assert!(matches!(err, RunError::Load(_)));
}
