//! Command runner.
//!
//! One invocation: stage files, select the organization, then run every
//! requested command in order. Staging and selection failures abort the whole
//! invocation. A failing command only fails its own result.

use gam_shim_core::{
    CommandResult, CommandSpec, InvocationLog, InvocationRequest, InvocationResponse, ShimConfig,
};
use gam_shim_executor::{ExternalTool, GamTool};
use gam_shim_staging::{Staging, StagingError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Staging failed: {0}")]
    Staging(#[from] StagingError),
    #[error("Error selecting org {org}: {reason}")]
    OrgSelection { org: String, reason: String },
}

pub struct Runner {
    staging: Staging,
    tool: Arc<dyn ExternalTool>,
    log: InvocationLog,
}

impl Runner {
    pub fn new(staging: Staging, tool: Arc<dyn ExternalTool>, log: InvocationLog) -> Self {
        Self { staging, tool, log }
    }

    /// Runner wired to the real tool binary and staging layout.
    pub fn from_config(config: &ShimConfig, log: InvocationLog) -> Self {
        let staging = Staging::new(config, log.clone());
        let tool = Arc::new(GamTool::new(&config.tool_binary, log.clone()));
        Self::new(staging, tool, log)
    }

    pub async fn handle(
        &self,
        request: Option<InvocationRequest>,
    ) -> Result<InvocationResponse, RunnerError> {
        let request = self.validate(request)?;
        tracing::debug!(parent: self.log.span(), event = ?request, "event received");

        if let Err(e) = self.staging.prepare().await {
            tracing::error!(parent: self.log.span(), error = %e, "could not set up files");
            return Err(e.into());
        }

        self.select_org(&request.org).await?;

        let mut response = InvocationResponse {
            results: Vec::with_capacity(request.cmds.len()),
        };
        for spec in &request.cmds {
            response.results.push(self.run_command(spec).await);
        }

        let failed = response.results.iter().filter(|r| !r.success).count();
        tracing::info!(
            parent: self.log.span(),
            total = response.results.len(),
            failed,
            "commands complete"
        );

        Ok(response)
    }

    fn validate(&self, request: Option<InvocationRequest>) -> Result<InvocationRequest, RunnerError> {
        let Some(request) = request else {
            tracing::error!(parent: self.log.span(), "event is nil");
            return Err(RunnerError::InvalidRequest("event is nil".to_string()));
        };

        if request.org.trim().is_empty() {
            tracing::error!(parent: self.log.span(), "event has no org");
            return Err(RunnerError::InvalidRequest("org cannot be empty".to_string()));
        }

        self.log.record_org(&request.org);
        Ok(request)
    }

    /// Nothing else can run until the tool has the organization saved.
    async fn select_org(&self, org: &str) -> Result<(), RunnerError> {
        let args = vec!["select".to_string(), org.to_string(), "save".to_string()];

        let reason = match self.tool.invoke(&args).await {
            Ok(out) if out.success => {
                tracing::info!(parent: self.log.span(), org, "org selected successfully");
                return Ok(());
            }
            Ok(out) => match out.exit_code {
                Some(code) => format!("exit status {}: {}", code, out.output.trim_end()),
                None => format!("terminated by signal: {}", out.output.trim_end()),
            },
            Err(e) => e.to_string(),
        };

        tracing::error!(parent: self.log.span(), org, error = %reason, "error selecting org");
        Err(RunnerError::OrgSelection {
            org: org.to_string(),
            reason,
        })
    }

    async fn run_command(&self, spec: &CommandSpec) -> CommandResult {
        let (success, output) = match self.tool.invoke(&spec.args).await {
            Ok(out) => (out.success, out.output),
            // spawn failures are reported like any other unsuccessful command
            Err(_) => (false, String::new()),
        };

        CommandResult {
            cmd: spec.command_line(),
            success,
            output,
        }
    }
}
