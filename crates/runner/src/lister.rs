use gam_shim_core::{InvocationLog, ListingResponse, ShimConfig};
use gam_shim_staging::filesystem;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListerError {
    #[error("Failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Lists the organizations that have a configuration directory.
pub struct Lister {
    clients_dir: PathBuf,
    log: InvocationLog,
}

impl Lister {
    pub fn new<P: AsRef<Path>>(clients_dir: P, log: InvocationLog) -> Self {
        Self {
            clients_dir: clients_dir.as_ref().to_path_buf(),
            log,
        }
    }

    pub fn from_config(config: &ShimConfig, log: InvocationLog) -> Self {
        Self::new(&config.clients_dir, log)
    }

    pub async fn list(&self) -> Result<ListingResponse, ListerError> {
        let clients = filesystem::list_subdirectories(&self.clients_dir)
            .await
            .map_err(|source| {
                tracing::error!(
                    parent: self.log.span(),
                    path = %self.clients_dir.display(),
                    error = %source,
                    "error reading clients directory"
                );
                ListerError::DirectoryRead {
                    path: self.clients_dir.clone(),
                    source,
                }
            })?;

        tracing::debug!(parent: self.log.span(), count = clients.len(), "clients listed");
        Ok(ListingResponse { clients })
    }
}
