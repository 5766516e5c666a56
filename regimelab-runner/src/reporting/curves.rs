//! Cumulative growth curves export (CSV/Parquet).
//!
//! One row per evaluated date with the growth of $1 for each variant. This
//! is the data behind the comparison chart.

use std::fs::File;
use std::path::Path;

use polars::prelude::{Column, DataFrame, ParquetWriter};
use regimelab_core::domain::PortfolioVariant;

use super::{io_error, ExportError};
use crate::runner::CumulativeCurves;

fn header() -> Vec<&'static str> {
    let mut header = vec!["date"];
    header.extend(PortfolioVariant::ALL.map(|v| v.key()));
    header
}

/// Cumulative curves as CSV text.
pub fn cumulative_csv(curves: &CumulativeCurves) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header())?;
    for (i, date) in curves.dates.iter().enumerate() {
        let mut record = vec![date.to_string()];
        for variant in PortfolioVariant::ALL {
            record.push(format!("{:.6}", curves.curve(variant)[i]));
        }
        wtr.write_record(&record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| ExportError::Io {
        path: "<memory>".into(),
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ExportError::Io {
        path: "<memory>".into(),
        reason: e.to_string(),
    })
}

pub fn write_cumulative_csv(path: &Path, curves: &CumulativeCurves) -> Result<(), ExportError> {
    let csv = cumulative_csv(curves)?;
    std::fs::write(path, csv).map_err(|e| io_error(path, e))
}

pub fn write_cumulative_parquet(path: &Path, curves: &CumulativeCurves) -> Result<(), ExportError> {
    let dates: Vec<String> = curves.dates.iter().map(|d| d.to_string()).collect();
    let mut columns = vec![Column::new("date".into(), dates)];
    for variant in PortfolioVariant::ALL {
        columns.push(Column::new(variant.key().into(), curves.curve(variant).to_vec()));
    }

    let mut df = DataFrame::new(columns)
        .map_err(|e| ExportError::Parquet(format!("build dataframe: {e}")))?;
    let mut file = File::create(path).map_err(|e| io_error(path, e))?;
    ParquetWriter::new(&mut file)
        .finish(&mut df)
        .map_err(|e| ExportError::Parquet(format!("write: {e}")))?;
    Ok(())
}
