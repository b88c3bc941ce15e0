use anyhow::Context as _;
use gam_shim_app::{list_clients, LISTER_FUNCTION};
use gam_shim_core::{logging, Profile, ShimConfig};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Profile::Production);

    let config = ShimConfig::default();
    config.validate().context("invalid shim configuration")?;
    let config = Arc::new(config);
    tracing::info!(function = LISTER_FUNCTION, "starting lambda runtime");

    // the payload carries nothing; accept whatever the caller sends
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let config = Arc::clone(&config);
        async move { list_clients(&config, &event.context.request_id).await }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("lambda runtime exited: {}", e))
}
