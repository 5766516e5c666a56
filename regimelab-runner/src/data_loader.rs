//! Series loading for the runner.
//!
//! Resolves each input to a `SeriesProvider`:
//! - `.csv` / `.txt` → `CsvSeriesProvider` (configurable columns and date format)
//! - `.parquet` / `.pq` → `ParquetSeriesProvider`
//! - `--synthetic` → the core `SyntheticProvider` pair (tagged in the result)
//!
//! Missing cells (empty, `null`, `NaN`, `NA`) are dropped at load time with a
//! warning. Anything else that fails to parse is an error; nothing is coerced.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use regimelab_core::data::{
    DataError, DataSource, SeriesProvider, SeriesRole, SyntheticConfig, SyntheticProvider,
};
use regimelab_core::domain::DatedValue;

use crate::config::SeriesInputConfig;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {role} series: {source}")]
    Series {
        role: SeriesRole,
        source: DataError,
    },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// One loaded input series with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub name: String,
    pub source: DataSource,
    pub values: Vec<DatedValue>,
}

/// Load one series through a provider, tagging errors with its role.
pub fn load_series(provider: &dyn SeriesProvider, role: SeriesRole) -> Result<LoadedSeries, LoadError> {
    let values = provider
        .load()
        .map_err(|source| LoadError::Series { role, source })?;
    if values.is_empty() {
        return Err(LoadError::Series {
            role,
            source: DataError::Empty {
                source_name: provider.name().to_string(),
            },
        });
    }
    debug!(provider = provider.name(), %role, rows = values.len(), "loaded series");
    Ok(LoadedSeries {
        name: provider.name().to_string(),
        source: provider.source(),
        values,
    })
}

/// Pick a provider for `path` by file extension.
pub fn provider_for_path(
    path: &Path,
    input: &SeriesInputConfig,
) -> Result<Box<dyn SeriesProvider>, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") | Some("txt") => Ok(Box::new(CsvSeriesProvider::new(path, input.clone()))),
        Some("parquet") | Some("pq") => {
            Ok(Box::new(ParquetSeriesProvider::new(path, input.clone())))
        }
        _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Price and volatility providers backed by one synthetic generator.
pub fn synthetic_providers(config: SyntheticConfig) -> (SyntheticProvider, SyntheticProvider) {
    warn!(
        seed = config.seed,
        days = config.trading_days,
        "using synthetic data; results are tagged as synthetic"
    );
    (
        SyntheticProvider::new(config.clone(), SeriesRole::Price),
        SyntheticProvider::new(config, SeriesRole::Volatility),
    )
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Reads a date column and a value column from a headered CSV file.
#[derive(Debug, Clone)]
pub struct CsvSeriesProvider {
    path: PathBuf,
    name: String,
    input: SeriesInputConfig,
}

impl CsvSeriesProvider {
    pub fn new(path: impl Into<PathBuf>, input: SeriesInputConfig) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name, input }
    }

    fn io_error(&self, e: impl std::fmt::Display) -> DataError {
        DataError::Io {
            path: self.name.clone(),
            reason: e.to_string(),
        }
    }

    fn column_index(&self, headers: &csv::StringRecord, column: &str) -> Result<usize, DataError> {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DataError::MissingColumn {
                source_name: self.name.clone(),
                column: column.to_string(),
            })
    }
}

impl SeriesProvider for CsvSeriesProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn load(&self) -> Result<Vec<DatedValue>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.io_error(e))?;

        let headers = reader.headers().map_err(|e| self.io_error(e))?.clone();
        let date_idx = self.column_index(&headers, &self.input.date_column)?;
        let value_idx = self.column_index(&headers, &self.input.value_column)?;

        let mut values = Vec::new();
        let mut skipped = 0usize;
        // Rows are numbered from 1, header excluded.
        for (i, record) in reader.records().enumerate() {
            let row = i + 1;
            let record = record.map_err(|e| self.io_error(e))?;
            let raw_date = record.get(date_idx).unwrap_or("");
            let raw_value = record.get(value_idx).unwrap_or("");

            let date = parse_date(raw_date, &self.input.date_format).ok_or_else(|| {
                DataError::BadDate {
                    source_name: self.name.clone(),
                    row,
                    value: raw_date.to_string(),
                    format: self.input.date_format.clone(),
                }
            })?;
            match parse_value(raw_value) {
                ParsedValue::Value(v) => values.push(DatedValue::new(date, v)),
                ParsedValue::Missing => skipped += 1,
                ParsedValue::Invalid => {
                    return Err(DataError::BadValue {
                        source_name: self.name.clone(),
                        row,
                        value: raw_value.to_string(),
                    })
                }
            }
        }

        if skipped > 0 {
            warn!(source = %self.name, skipped, "dropped rows with missing values");
        }
        if values.is_empty() {
            return Err(DataError::Empty {
                source_name: self.name.clone(),
            });
        }
        Ok(values)
    }
}

// ─── Parquet ────────────────────────────────────────────────────────

/// Reads a date column (Date dtype or string) and a numeric value column
/// from a Parquet file.
#[derive(Debug, Clone)]
pub struct ParquetSeriesProvider {
    path: PathBuf,
    name: String,
    input: SeriesInputConfig,
}

impl ParquetSeriesProvider {
    pub fn new(path: impl Into<PathBuf>, input: SeriesInputConfig) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name, input }
    }

    fn column<'a>(&self, df: &'a DataFrame, column: &str) -> Result<&'a Column, DataError> {
        df.column(column).map_err(|_| DataError::MissingColumn {
            source_name: self.name.clone(),
            column: column.to_string(),
        })
    }

    fn dates(&self, column: &Column) -> Result<Vec<Option<NaiveDate>>, DataError> {
        let map_err = |e: PolarsError| DataError::Parquet(format!("date column: {e}"));
        match column.dtype() {
            DataType::Date => {
                // Date is stored as days since 1970-01-01.
                let epoch = NaiveDate::default();
                let ca = column.date().map_err(map_err)?;
                Ok((0..column.len())
                    .map(|i| {
                        ca.get(i)
                            .map(|days| epoch + chrono::Duration::days(days as i64))
                    })
                    .collect())
            }
            DataType::String => {
                let ca = column.str().map_err(map_err)?;
                Ok((0..column.len())
                    .map(|i| {
                        ca.get(i)
                            .and_then(|raw| parse_date(raw, &self.input.date_format))
                    })
                    .collect())
            }
            other => Err(DataError::Parquet(format!(
                "date column '{}' has unsupported type {other}",
                self.input.date_column
            ))),
        }
    }
}

impl SeriesProvider for ParquetSeriesProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> DataSource {
        DataSource::ParquetImport
    }

    fn load(&self) -> Result<Vec<DatedValue>, DataError> {
        let file = File::open(&self.path).map_err(|e| DataError::Io {
            path: self.name.clone(),
            reason: e.to_string(),
        })?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| DataError::Parquet(format!("read: {e}")))?;
        if df.height() == 0 {
            return Err(DataError::Empty {
                source_name: self.name.clone(),
            });
        }

        let dates = self.dates(self.column(&df, &self.input.date_column)?)?;
        let value_column = self
            .column(&df, &self.input.value_column)?
            .cast(&DataType::Float64)
            .map_err(|e| DataError::Parquet(format!("value column: {e}")))?;
        let value_ca = value_column
            .f64()
            .map_err(|e| DataError::Parquet(format!("value column: {e}")))?;

        let mut values = Vec::with_capacity(df.height());
        let mut skipped = 0usize;
        for (i, date) in dates.into_iter().enumerate() {
            let date = date.ok_or_else(|| DataError::BadDate {
                source_name: self.name.clone(),
                row: i + 1,
                value: String::from("<null or unparseable>"),
                format: self.input.date_format.clone(),
            })?;
            match value_ca.get(i) {
                Some(v) if v.is_finite() => values.push(DatedValue::new(date, v)),
                Some(v) if v.is_infinite() => {
                    return Err(DataError::BadValue {
                        source_name: self.name.clone(),
                        row: i + 1,
                        value: v.to_string(),
                    })
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(source = %self.name, skipped, "dropped rows with missing values");
        }
        if values.is_empty() {
            return Err(DataError::Empty {
                source_name: self.name.clone(),
            });
        }
        Ok(values)
    }
}

// ─── Field parsing ──────────────────────────────────────────────────

enum ParsedValue {
    Value(f64),
    Missing,
    Invalid,
}

fn parse_value(raw: &str) -> ParsedValue {
    let raw = raw.trim();
    if raw.is_empty() || ["null", "nan", "na", "n/a"].contains(&raw.to_ascii_lowercase().as_str()) {
        return ParsedValue::Missing;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => ParsedValue::Value(v),
        _ => ParsedValue::Invalid,
    }
}

/// Parse with `format`; a time-of-day suffix after a space or `T` is ignored.
fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, format).ok().or_else(|| {
        let day = raw.split([' ', 'T']).next()?;
        if day.len() == raw.len() {
            return None;
        }
        NaiveDate::parse_from_str(day, format).ok()
    })
}
