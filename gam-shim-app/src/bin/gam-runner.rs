use anyhow::Context as _;
use gam_shim_app::{run_commands, RUNNER_FUNCTION};
use gam_shim_core::{logging, InvocationRequest, Profile, ShimConfig};
use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Profile::Production);

    let config = ShimConfig::default();
    config.validate().context("invalid shim configuration")?;
    let config = Arc::new(config);
    tracing::info!(function = RUNNER_FUNCTION, "starting lambda runtime");

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<Option<InvocationRequest>>| {
            let config = Arc::clone(&config);
            async move { run_commands(&config, event.payload, &event.context.request_id).await }
        },
    ))
    .await
    .map_err(|e| anyhow::anyhow!("lambda runtime exited: {}", e))
}
