//! CLI command implementations.

pub mod scenario;
