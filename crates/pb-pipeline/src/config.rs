use pb_compactor::CompactorSpec;
use pb_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// What the batch driver does when a file fails to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole package; nothing is written.
    #[default]
    Abort,
    /// Leave the file out and keep going.
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Registered in listed order.
    pub compactors: Vec<CompactorSpec>,
    /// Raw placeholder keys to scalar values.
    pub values: Map<String, Value>,
    pub on_error: FailurePolicy,
}

impl PackConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
