//! Reporting and artifact export pipeline.

pub mod curves;
pub mod json;
pub mod markdown;
pub mod table;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::runner::RunResult;

pub use curves::{cumulative_csv, write_cumulative_csv, write_cumulative_parquet};
pub use json::{export_json, import_json, read_result_json, write_result_json};
pub use markdown::MarkdownReportGenerator;
pub use table::{ResultsTable, TableRow};

pub const COMPARISON_CSV: &str = "portfolio_comparison.csv";
pub const CUMULATIVE_CSV: &str = "cumulative.csv";
pub const CUMULATIVE_PARQUET: &str = "cumulative.parquet";
pub const REPORT_MARKDOWN: &str = "report.md";
pub const RESULT_JSON: &str = "result.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error at '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet error: {0}")]
    Parquet(String),

    #[error("unsupported schema version {found} (max supported: {supported})")]
    SchemaVersion { found: u32, supported: u32 },
}

pub(crate) fn io_error(path: &Path, e: impl std::fmt::Display) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub comparison_csv: PathBuf,
    pub cumulative_csv: PathBuf,
    pub cumulative_parquet: PathBuf,
    pub report_markdown: PathBuf,
    pub result_json: PathBuf,
}

/// Writes every artifact of a run into one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).map_err(|e| io_error(&output_dir, e))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save the comparison table, cumulative curves, report and JSON result.
    pub fn save_run(&self, result: &RunResult) -> Result<ArtifactPaths, ExportError> {
        let paths = ArtifactPaths {
            comparison_csv: self.output_dir.join(COMPARISON_CSV),
            cumulative_csv: self.output_dir.join(CUMULATIVE_CSV),
            cumulative_parquet: self.output_dir.join(CUMULATIVE_PARQUET),
            report_markdown: self.output_dir.join(REPORT_MARKDOWN),
            result_json: self.output_dir.join(RESULT_JSON),
        };

        let table = ResultsTable::from_result(result);
        table.write_csv(&paths.comparison_csv)?;
        write_cumulative_csv(&paths.cumulative_csv, &result.curves)?;
        write_cumulative_parquet(&paths.cumulative_parquet, &result.curves)?;

        let report = MarkdownReportGenerator.generate(result);
        std::fs::write(&paths.report_markdown, report)
            .map_err(|e| io_error(&paths.report_markdown, e))?;
        write_result_json(&paths.result_json, result)?;

        info!(
            dir = %self.output_dir.display(),
            run_id = result.fingerprint.short_id(),
            "artifacts written"
        );
        Ok(paths)
    }
}
