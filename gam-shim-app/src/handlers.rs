//! Function handlers, one per Lambda function.
//!
//! Each call builds its own [`InvocationLog`] from the platform request id and
//! hands it to the components it constructs.

use gam_shim_core::{InvocationLog, InvocationRequest, InvocationResponse, ListingResponse, ShimConfig};
use gam_shim_runner::{Lister, Runner};
use lambda_runtime::Error;

pub const RUNNER_FUNCTION: &str = "gam-runner";
pub const LISTER_FUNCTION: &str = "gam-listclients";

/// Run a batch of GAM commands for one organization.
///
/// A `null` payload, a staging failure or a failed org selection fails the
/// whole invocation; individual command failures are reported in the body.
pub async fn run_commands(
    config: &ShimConfig,
    payload: Option<InvocationRequest>,
    request_id: &str,
) -> Result<InvocationResponse, Error> {
    let log = InvocationLog::new(RUNNER_FUNCTION, request_id);
    let runner = Runner::from_config(config, log);
    Ok(runner.handle(payload).await?)
}

/// List organizations with a configuration directory. Takes no input.
pub async fn list_clients(config: &ShimConfig, request_id: &str) -> Result<ListingResponse, Error> {
    let log = InvocationLog::new(LISTER_FUNCTION, request_id);
    let lister = Lister::from_config(config, log);
    Ok(lister.list().await?)
}
