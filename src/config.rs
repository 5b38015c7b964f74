use regex::Regex;
use serde::Deserialize;
use swc_core::common::DUMMY_SP;

use crate::error::MacroError;

/// Import sources treated as macro modules unless configured otherwise,
/// e.g. `"./decorate.macro"` or `"../macro.js"`.
pub const DEFAULT_SOURCE_PATTERN: &str = r"[./]macro(\.c?js)?$";

/// Plugin options, read from the JSON config handed over by SWC.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MacroConfig {
    pub source_pattern: String,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            source_pattern: DEFAULT_SOURCE_PATTERN.to_string(),
        }
    }
}

impl MacroConfig {
    /// Malformed JSON falls back to the defaults.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn source_matcher(&self) -> Result<Regex, MacroError> {
        Regex::new(&self.source_pattern).map_err(|err| {
            MacroError::new(
                DUMMY_SP,
                format!("Invalid macro source pattern `{}`: {err}", self.source_pattern),
            )
        })
    }
}
