use crate::filesystem;
use gam_shim_core::{InvocationLog, ShimConfig};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to copy {src} into {dst}: {source}")]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },
}

/// Prepares the writable area the tool runs against.
///
/// Every invocation redoes both steps from scratch, so both are safe to
/// repeat: the work directory is created only if missing and the
/// configuration copy is merged over whatever a previous run left.
pub struct Staging {
    work_dir: PathBuf,
    config_source: PathBuf,
    staging_root: PathBuf,
    log: InvocationLog,
}

impl Staging {
    pub fn new(config: &ShimConfig, log: InvocationLog) -> Self {
        Self {
            work_dir: config.work_dir(),
            config_source: config.config_source.clone(),
            staging_root: config.staging_root.clone(),
            log,
        }
    }

    pub async fn prepare(&self) -> Result<(), StagingError> {
        filesystem::create_dir(&self.work_dir)
            .await
            .map_err(|source| {
                tracing::error!(parent: self.log.span(), path = %self.work_dir.display(), error = %source, "error creating directory");
                StagingError::CreateDir {
                    path: self.work_dir.clone(),
                    source,
                }
            })?;
        tracing::debug!(parent: self.log.span(), path = %self.work_dir.display(), "work directory ready");

        let staged = filesystem::copy_dir_into(&self.config_source, &self.staging_root)
            .await
            .map_err(|source| {
                tracing::error!(
                    parent: self.log.span(),
                    src = %self.config_source.display(),
                    dst = %self.staging_root.display(),
                    error = %source,
                    "error copying directory"
                );
                StagingError::Copy {
                    src: self.config_source.clone(),
                    dst: self.staging_root.clone(),
                    source,
                }
            })?;
        tracing::debug!(
            parent: self.log.span(),
            src = %self.config_source.display(),
            dst = %staged.display(),
            "configuration copied"
        );

        tracing::info!(parent: self.log.span(), "success setting up all necessary files");
        Ok(())
    }
}
