//! External tool invocation.
//!
//! The tool is treated as a black box: an argument vector goes in, combined
//! stdout/stderr text and an exit status come out.

use async_trait::async_trait;
use gam_shim_core::{command_line, InvocationLog};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invocation task failed: {0}")]
    Join(String),
}

/// Outcome of a process that actually ran, whatever its exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub output: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
}

#[async_trait]
pub trait ExternalTool: Send + Sync {
    /// Run the tool once with `args` and wait for it to exit.
    async fn invoke(&self, args: &[String]) -> Result<ToolOutput, InvokeError>;
}

/// The GAM binary shipped in the deployment layer.
pub struct GamTool {
    binary: PathBuf,
    log: InvocationLog,
}

impl GamTool {
    pub fn new<P: AsRef<Path>>(binary: P, log: InvocationLog) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
            log,
        }
    }
}

#[async_trait]
impl ExternalTool for GamTool {
    async fn invoke(&self, args: &[String]) -> Result<ToolOutput, InvokeError> {
        let program = self.binary.clone();
        let owned_args = args.to_vec();

        let result = tokio::task::spawn_blocking(move || run_combined(&program, &owned_args))
            .await
            .map_err(|e| InvokeError::Join(e.to_string()))?;

        let cmd = command_line(args);
        match &result {
            Ok(out) if out.success => {
                tracing::debug!(parent: self.log.span(), cmd = %cmd, output = %out.output, "gam command successful");
            }
            Ok(out) => {
                tracing::warn!(
                    parent: self.log.span(),
                    cmd = %cmd,
                    exit_code = ?out.exit_code,
                    output = %out.output,
                    "gam command unsuccessful"
                );
            }
            Err(e) => {
                tracing::warn!(parent: self.log.span(), cmd = %cmd, error = %e, "gam command could not be run");
            }
        }

        result
    }
}

/// Spawn `program`, with stdout and stderr sharing one pipe so the two
/// streams keep the order in which the child wrote them.
fn run_combined(program: &Path, args: &[String]) -> Result<ToolOutput, InvokeError> {
    let (mut reader, writer) = std::io::pipe()?;
    let stderr_writer = writer.try_clone()?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr_writer);

    let spawned = command.spawn();
    // The command still owns the parent's write ends; EOF needs them closed.
    drop(command);

    let mut child = spawned.map_err(|source| InvokeError::Spawn {
        program: program.display().to_string(),
        source,
    })?;

    let mut buf = Vec::new();
    let read = reader.read_to_end(&mut buf);
    let status = child.wait()?;
    read?;

    Ok(ToolOutput {
        output: String::from_utf8_lossy(&buf).into_owned(),
        exit_code: status.code(),
        success: status.success(),
    })
}
