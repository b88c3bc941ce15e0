//! Lambda entry points for the GAM command shim.

pub mod handlers;

pub use handlers::{list_clients, run_commands, LISTER_FUNCTION, RUNNER_FUNCTION};
