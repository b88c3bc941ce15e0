//! Request handling: the command runner and the organization lister.

pub mod lister;
pub mod runner;

pub use lister::{Lister, ListerError};
pub use runner::{Runner, RunnerError};
