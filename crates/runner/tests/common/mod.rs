#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use gam_shim_core::{InvocationLog, ShimConfig};
use gam_shim_executor::{ExternalTool, InvokeError, ToolOutput};
use gam_shim_runner::Runner;
use gam_shim_staging::Staging;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Script = dyn Fn(&[String]) -> Result<ToolOutput, InvokeError> + Send + Sync;

/// Stand-in for the GAM binary: answers from a closure and records every call.
pub struct ScriptedTool {
    script: Box<Script>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedTool {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&[String]) -> Result<ToolOutput, InvokeError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExternalTool for ScriptedTool {
    async fn invoke(&self, args: &[String]) -> Result<ToolOutput, InvokeError> {
        self.calls.lock().unwrap().push(args.to_vec());
        (self.script)(args)
    }
}

pub fn ok(output: &str) -> Result<ToolOutput, InvokeError> {
    Ok(ToolOutput {
        output: output.to_string(),
        exit_code: Some(0),
        success: true,
    })
}

pub fn exit(code: i32, output: &str) -> Result<ToolOutput, InvokeError> {
    Ok(ToolOutput {
        output: output.to_string(),
        exit_code: Some(code),
        success: false,
    })
}

pub fn spawn_failure() -> Result<ToolOutput, InvokeError> {
    Err(InvokeError::Spawn {
        program: "/opt/gam7/gam".to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })
}

/// Temp tree with a configuration source containing one client.
pub fn seeded_config(tool_binary: &str) -> (TempDir, ShimConfig) {
    let temp = TempDir::new().unwrap();
    let config = ShimConfig::rooted_at(temp.path(), tool_binary);
    std::fs::create_dir_all(config.clients_dir.join("acme")).unwrap();
    std::fs::write(config.config_source.join("gam.cfg"), "[DEFAULT]\n").unwrap();
    (temp, config)
}

pub fn runner_with(config: &ShimConfig, tool: Arc<ScriptedTool>) -> Runner {
    let log = InvocationLog::detached();
    Runner::new(Staging::new(config, log.clone()), tool, log)
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
