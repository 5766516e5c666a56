//! Results table: one row per portfolio variant, four metrics, rounded.
//!
//! An undefined Sharpe ratio renders as `NaN`, never as zero.

use std::path::Path;

use regimelab_core::domain::PortfolioVariant;

use super::{io_error, ExportError};
use crate::runner::{RunResult, VariantResult};

pub const COLUMNS: [&str; 4] = [
    "Total Return",
    "Annualized Return",
    "Sharpe Ratio",
    "Max Drawdown",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub variant: PortfolioVariant,
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe: Option<f64>,
    pub max_drawdown: f64,
}

impl TableRow {
    pub fn label(&self) -> &'static str {
        self.variant.label()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    pub rows: Vec<TableRow>,
    pub decimals: u32,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    // Normalize -0.0 so "-0.0000" never shows up.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

impl ResultsTable {
    pub fn from_result(result: &RunResult) -> Self {
        Self::from_variants(&result.variants, result.config.evaluation.round_decimals)
    }

    pub fn from_variants(variants: &[VariantResult], decimals: u32) -> Self {
        let rows = variants
            .iter()
            .map(|v| TableRow {
                variant: v.variant,
                total_return: round_to(v.summary.total_return, decimals),
                annualized_return: round_to(v.summary.annualized_return, decimals),
                sharpe: v.summary.sharpe.map(|s| round_to(s, decimals)),
                max_drawdown: round_to(v.summary.max_drawdown, decimals),
            })
            .collect();
        Self { rows, decimals }
    }

    pub fn row(&self, variant: PortfolioVariant) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.variant == variant)
    }

    fn cell(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.*}", self.decimals as usize, v),
            None => "NaN".to_string(),
        }
    }

    fn cells(&self, row: &TableRow) -> [String; 4] {
        [
            self.cell(Some(row.total_return)),
            self.cell(Some(row.annualized_return)),
            self.cell(row.sharpe),
            self.cell(Some(row.max_drawdown)),
        ]
    }

    /// Fixed-width text for the console.
    pub fn render(&self) -> String {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.label().len())
            .max()
            .unwrap_or(0)
            .max("Portfolio".len());

        let mut out = format!("{:<label_width$}", "Portfolio");
        for col in COLUMNS {
            out.push_str(&format!("  {col:>w$}", w = col.len().max(10)));
        }
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!("{:<label_width$}", row.label()));
            for (col, cell) in COLUMNS.iter().zip(self.cells(row)) {
                out.push_str(&format!("  {cell:>w$}", w = col.len().max(10)));
            }
            out.push('\n');
        }
        out
    }

    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        let mut header = vec!["Portfolio"];
        header.extend(COLUMNS);
        wtr.write_record(&header)?;
        for row in &self.rows {
            let [a, b, c, d] = self.cells(row);
            wtr.write_record([row.label(), a.as_str(), b.as_str(), c.as_str(), d.as_str()])?;
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

    pub fn write_csv(&self, path: &Path) -> Result<(), ExportError> {
        let csv = self.to_csv()?;
        std::fs::write(path, csv).map_err(|e| io_error(path, e))
    }
}
