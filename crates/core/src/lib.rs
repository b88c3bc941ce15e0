//! Shared model, configuration and logging for the GAM command shim.

pub mod config;
pub mod logging;
pub mod types;

pub use config::{ConfigError, ShimConfig};
pub use logging::{InvocationLog, Profile};
pub use types::*;
