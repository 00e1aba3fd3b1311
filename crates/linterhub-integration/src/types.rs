//! JSON payloads returned by the CLI.
//!
//! Fields the CLI adds later are kept in `extra` rather than dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinterResult {
    pub name:        String,
    pub description: String,
    pub languages:   String,
    pub active:      bool,
    #[serde(flatten)]
    pub extra:       Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinterVersionResult {
    pub linter_name: String,
    pub installed:   bool,
    pub version:     String,
    #[serde(flatten)]
    pub extra:       Map<String, Value>,
}
