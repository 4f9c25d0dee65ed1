//! Project configuration stored at `<root>/dataio.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DataioError, Result};

pub const CONFIG_FILE: &str = "dataio.toml";

/// Project configuration (TOML).
///
/// The file is optional and meant to be edited by hand. Missing fields
/// default to empty values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataioConfig {
    /// Root-relative paths verified by `dataio check` when none are given.
    pub required_files: Vec<PathBuf>,
}

impl DataioConfig {
    pub fn validate(&self, path: &Path) -> Result<()> {
        for entry in &self.required_files {
            if entry.as_os_str().is_empty() {
                return Err(DataioError::config(
                    path,
                    "required_files entries must be non-empty",
                ));
            }
            if entry.is_absolute() {
                return Err(DataioError::config(
                    path,
                    format!(
                        "required_files entry {} must be relative to the project root",
                        entry.display()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Required files resolved against `root`.
    pub fn required_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.required_files.iter().map(|p| root.join(p)).collect()
    }
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DataioConfig::default()`.
pub fn load_config(path: &Path) -> Result<DataioConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(DataioConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|e| DataioError::io(path, e))?;
    let cfg: DataioConfig =
        toml::from_str(&contents).map_err(|e| DataioError::config(path, e.to_string()))?;
    cfg.validate(path)?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &DataioConfig) -> Result<()> {
    cfg.validate(path)?;
    let mut buf =
        toml::to_string_pretty(cfg).map_err(|e| DataioError::config(path, e.to_string()))?;
    buf.push('\n');
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, &buf).map_err(|e| DataioError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| DataioError::io(path, e))
}
