//! JSON log output shared by the userbase binaries.

pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init};
