//! Filesystem layout the shim operates on.
//!
//! Production always uses [`ShimConfig::default`]; the paths are fixed by the
//! deployment layers (tool binary and configuration tree under `/opt`, the
//! writable area under `/tmp`). Other values only exist for tests.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TOOL_BINARY: &str = "/opt/gam7/gam";
pub const DEFAULT_CONFIG_SOURCE: &str = "/opt/GAMConfig";
pub const DEFAULT_CLIENTS_DIR: &str = "/opt/GAMConfig/clients";
pub const DEFAULT_STAGING_ROOT: &str = "/tmp/resources";
pub const DEFAULT_WORK_DIR_NAME: &str = "GAMWork";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimConfig {
    /// External administration binary.
    pub tool_binary: PathBuf,
    /// Read-only configuration tree copied into the staging root.
    pub config_source: PathBuf,
    /// One subdirectory per organization.
    pub clients_dir: PathBuf,
    pub staging_root: PathBuf,
    pub work_dir_name: String,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            tool_binary: PathBuf::from(DEFAULT_TOOL_BINARY),
            config_source: PathBuf::from(DEFAULT_CONFIG_SOURCE),
            clients_dir: PathBuf::from(DEFAULT_CLIENTS_DIR),
            staging_root: PathBuf::from(DEFAULT_STAGING_ROOT),
            work_dir_name: DEFAULT_WORK_DIR_NAME.to_string(),
        }
    }
}

impl ShimConfig {
    /// Layout rooted in `base`, mirroring the production tree. Used by tests.
    pub fn rooted_at<P: AsRef<Path>>(base: P, tool_binary: impl Into<PathBuf>) -> Self {
        let base = base.as_ref();
        let config_source = base.join("opt").join("GAMConfig");
        Self {
            tool_binary: tool_binary.into(),
            clients_dir: config_source.join("clients"),
            config_source,
            staging_root: base.join("tmp").join("resources"),
            work_dir_name: DEFAULT_WORK_DIR_NAME.to_string(),
        }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.staging_root.join(&self.work_dir_name)
    }

    /// Where the configuration tree lands once staged (`cp -r SRC ROOT`).
    pub fn staged_config_dir(&self) -> PathBuf {
        match self.config_source.file_name() {
            Some(name) => self.staging_root.join(name),
            None => self.staging_root.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("tool_binary", &self.tool_binary),
            ("config_source", &self.config_source),
            ("clients_dir", &self.clients_dir),
            ("staging_root", &self.staging_root),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!("{} cannot be empty", field)));
            }
        }

        if self.config_source.file_name().is_none() {
            return Err(ConfigError::Invalid(format!(
                "config_source has no final component: {}",
                self.config_source.display()
            )));
        }

        if self.work_dir_name.trim().is_empty() {
            return Err(ConfigError::Invalid("work_dir_name cannot be empty".to_string()));
        }

        if self.work_dir_name.contains(std::path::is_separator) {
            return Err(ConfigError::Invalid(format!(
                "work_dir_name must be a single path component: {}",
                self.work_dir_name
            )));
        }

        Ok(())
    }
}
