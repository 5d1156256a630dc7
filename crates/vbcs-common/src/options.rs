//! Options for the qualification and nullable-lowering passes.
//!
//! Options are plain data deserialized from camelCase JSON, the same shape a
//! host converter keeps next to its project settings:
//!
//! ```json
//! {
//!   "tempNamePrefix": "arg",
//!   "explicitNullableCasts": false
//! }
//! ```
//!
//! Every field has a default, so an empty object is a valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error returned when an options document cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid lowering options: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tempNamePrefix must be a non-empty identifier, got '{0}'")]
    InvalidTempPrefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoweringOptions {
    /// Prefix for bindings introduced by `is var` / `is { }` captures.
    pub temp_name_prefix: String,
    /// Emit `(bool?)null`, `(bool?)true` and `(bool?)false` in conditional
    /// arms instead of bare literals that rely on target typing.
    pub explicit_nullable_casts: bool,
    /// Run the qualification hook on every visited node.
    pub qualify_names: bool,
    /// Run the nullable logic lowering on binary expressions.
    pub lower_nullable_logic: bool,
    /// Consult enclosing `HasValue`/`IsNot Nothing` checks before guarding an
    /// operand again.
    pub simplify_checked_comparisons: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        LoweringOptions {
            temp_name_prefix: "arg".to_string(),
            explicit_nullable_casts: true,
            qualify_names: true,
            lower_nullable_logic: true,
            simplify_checked_comparisons: true,
        }
    }
}

impl LoweringOptions {
    /// Parse options from a JSON document and validate them.
    pub fn from_json(text: &str) -> std::result::Result<Self, OptionsError> {
        let options: LoweringOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from a JSON file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lowering options {}", path.display()))?;
        let options = Self::from_json(&text)
            .with_context(|| format!("failed to parse lowering options {}", path.display()))?;
        Ok(options)
    }

    pub fn validate(&self) -> std::result::Result<(), OptionsError> {
        let prefix = &self.temp_name_prefix;
        let mut chars = prefix.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(OptionsError::InvalidTempPrefix(prefix.clone()))
        }
    }
}

#[cfg(test)]
#[path = "../tests/options.rs"]
mod tests;
