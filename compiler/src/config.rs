use crate::{error::DtsError, walker::WalkerOptions};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOT_FILE: &str = "protocol.d.ts";
pub const DEFAULT_BUILTIN_FILE_PATTERN: &str = r"^lib(\..+)?\.d\.ts$";
/// Built-in sequence wrappers whose element type is walked instead of the
/// wrapper itself. `ReadOnlyArray` is the spelling older services files use.
pub const DEFAULT_ARRAY_LIKE_TYPES: [&str; 3] = ["Array", "ReadonlyArray", "ReadOnlyArray"];

/// Settings for one `build-protocol` run. Every field has a default, so a
/// config file only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolConfig {
    pub root_file:            String,
    pub protocol_namespace:   String,
    pub stub_namespace:       String,
    pub export_alias:         String,
    pub builtin_file_pattern: String,
    pub array_like_types:     Vec<String>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            root_file:            DEFAULT_ROOT_FILE.to_string(),
            protocol_namespace:   "ts.server.protocol".to_string(),
            stub_namespace:       "ts".to_string(),
            export_alias:         "protocol".to_string(),
            builtin_file_pattern: DEFAULT_BUILTIN_FILE_PATTERN.to_string(),
            array_like_types:     DEFAULT_ARRAY_LIKE_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProtocolConfig {
    pub fn from_json(text: &str) -> Result<Self, DtsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn walker_options(&self) -> Result<WalkerOptions, DtsError> {
        Ok(WalkerOptions {
            builtin_files: Regex::new(&self.builtin_file_pattern)?,
            array_like:    self.array_like_types.clone(),
        })
    }
}
