//! JSON persistence of run results.
//!
//! Every result carries a `schema_version`; versions newer than this build
//! understands are rejected on load.

use std::path::Path;

use super::{io_error, ExportError};
use crate::runner::{RunResult, SCHEMA_VERSION};

pub fn export_json(result: &RunResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn import_json(json: &str) -> Result<RunResult, ExportError> {
    let result: RunResult = serde_json::from_str(json)?;
    if result.schema_version > SCHEMA_VERSION {
        return Err(ExportError::SchemaVersion {
            found: result.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(result)
}

pub fn write_result_json(path: &Path, result: &RunResult) -> Result<(), ExportError> {
    let json = export_json(result)?;
    std::fs::write(path, json).map_err(|e| io_error(path, e))
}

pub fn read_result_json(path: &Path) -> Result<RunResult, ExportError> {
    let json = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    import_json(&json)
}
