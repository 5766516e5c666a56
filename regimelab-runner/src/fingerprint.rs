//! Run fingerprinting.
//!
//! A run is identified by what went into it: the configuration and the
//! aligned dataset. Re-running the same config on the same data yields the
//! same `run_id`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    /// BLAKE3 over `config_hash` and `dataset_hash`.
    pub run_id: String,
    pub config_hash: String,
    pub dataset_hash: String,
}

impl RunFingerprint {
    pub fn new(config_hash: impl Into<String>, dataset_hash: impl Into<String>) -> Self {
        let config_hash = config_hash.into();
        let dataset_hash = dataset_hash.into();
        let mut hasher = blake3::Hasher::new();
        hasher.update(config_hash.as_bytes());
        hasher.update(b":");
        hasher.update(dataset_hash.as_bytes());
        Self {
            run_id: hasher.finalize().to_hex().to_string(),
            config_hash,
            dataset_hash,
        }
    }

    /// First 12 hex characters, for log lines and report headers.
    pub fn short_id(&self) -> &str {
        &self.run_id[..12.min(self.run_id.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_id() {
        let a = RunFingerprint::new("cfg", "data");
        let b = RunFingerprint::new("cfg", "data");
        assert_eq!(a, b);
        assert_eq!(a.run_id.len(), 64);
        assert_eq!(a.short_id().len(), 12);
    }

    #[test]
    fn either_input_changes_id() {
        let base = RunFingerprint::new("cfg", "data");
        assert_ne!(base.run_id, RunFingerprint::new("cfg2", "data").run_id);
        assert_ne!(base.run_id, RunFingerprint::new("cfg", "data2").run_id);
    }

    #[test]
    fn separator_prevents_concatenation_collisions() {
        let a = RunFingerprint::new("ab", "c");
        let b = RunFingerprint::new("a", "bc");
        assert_ne!(a.run_id, b.run_id);
    }
}
