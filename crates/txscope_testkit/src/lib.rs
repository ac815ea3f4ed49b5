//! # txscope Testkit
//!
//! Test utilities for txscope.
//!
//! This crate provides:
//! - Test fixtures: a test entity and a harness wiring an in-memory store,
//!   a `Transactional` and an `EntityDao`
//! - Property-based test generators using proptest
//! - Call-chain helpers for nested propagation tests
//!
//! ## Usage
//!
//! ```rust
//! use txscope_testkit::prelude::*;
//!
//! let harness = TestHarness::new();
//! harness
//!     .tx
//!     .required(|| harness.dao.save(&TestEntity::new("key1", "val1")))
//!     .unwrap();
//! assert_eq!(harness.transact_keys(), vec![vec!["key1".to_string()]]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod chain;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chain::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use chain::*;
pub use fixtures::*;
pub use generators::*;
