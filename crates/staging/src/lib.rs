//! Working-area preparation and the filesystem primitives behind it.

pub mod filesystem;
pub mod staging;

pub use staging::{Staging, StagingError};
