//! vslc_options: `vslc.json` parsing and binder options.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// What to do when a name is declared twice in the same scope.
///
/// In every mode the later declaration replaces the earlier one for lookups;
/// the modes differ only in what gets reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace silently.
    #[default]
    Shadow,
    /// Replace and report a warning.
    Warn,
    /// Replace and report an error, failing the compilation.
    Error,
}

/// Options consumed by the binding phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindOptions {
    pub duplicate_declarations: DuplicatePolicy,
    /// Initial capacity of the string pool. Defaults to the pool's own minimum.
    pub string_pool_capacity: Option<usize>,
}

/// The `vslc.json` file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VslConfig {
    pub bind_options: Option<BindOptions>,
}

impl VslConfig {
    /// Bind options from the file, or the defaults when the section is absent.
    pub fn bind_options(&self) -> BindOptions {
        self.bind_options.clone().unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid vslc.json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a `vslc.json` file from a string.
pub fn parse_config(content: &str) -> Result<VslConfig, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a `vslc.json` file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<VslConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}
