//! RegimeLab Runner — run orchestration, metrics, and reporting.
//!
//! This crate builds on `regimelab-core` to provide:
//! - TOML run configuration with validation and hashing
//! - CSV/Parquet series loading with a synthetic fallback for demos
//! - The end-to-end pipeline runner and run fingerprinting
//! - Performance metrics per portfolio variant
//! - Results table, cumulative curves, markdown report and JSON artifacts

pub mod config;
pub mod data_loader;
pub mod fingerprint;
pub mod metrics;
pub mod reporting;
pub mod runner;

pub use config::{
    ConfigError, EvaluationConfig, InputConfig, RegimeConfig, RunConfig, SeriesInputConfig,
};
pub use data_loader::{
    load_series, provider_for_path, synthetic_providers, CsvSeriesProvider, LoadError,
    LoadedSeries, ParquetSeriesProvider,
};
pub use fingerprint::RunFingerprint;
pub use metrics::{performance_metrics, MetricsError, PerformanceSummary};
pub use reporting::{ArtifactManager, ArtifactPaths, ExportError, ResultsTable};
pub use runner::{
    run_from_providers, run_pipeline, CumulativeCurves, RegimeCounts, RunDiagnostics, RunError,
    RunResult, VariantResult, SCHEMA_VERSION,
};
