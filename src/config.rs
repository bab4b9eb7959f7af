//! Configuration file support for attest-graph.
//!
//! Provides YAML-based configuration through `attest-graph.config.yml`
//! files, including data structures, file loading, and validation. CLI
//! flags always win over config file values.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::attestation_graph::domain::Platform;
use crate::shared::Result;

const CONFIG_FILENAME: &str = "attest-graph.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub platform: Option<String>,
    pub format: Option<String>,
    pub check_cve: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub cosign_path: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref platform) = config.platform {
        Platform::from_str(platform).with_context(|| {
            format!(
                "Invalid config: platform '{}' is not supported.",
                platform
            )
        })?;
    }

    if let Some(timeout) = config.timeout_seconds {
        if timeout == 0 {
            bail!(
                "Invalid config: timeout_seconds must be greater than zero.\n\n\
                 💡 Hint: A timeout of 0 would abort every attestation fetch immediately."
            );
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
