//! # txscope Core
//!
//! Client-side nested transactions over a store whose only transactional
//! primitive is one atomic multi-item write.
//!
//! This crate provides:
//! - [`TransactionManager`]: single-use accumulator with commit-once semantics
//! - [`TransactionManagerFactory`]: a fresh manager per logical transaction
//! - [`TransactionContext`]: the per-thread binding of the active manager
//! - [`Transactional`]: the wrapper that resolves [`Propagation`] for a call
//! - [`EntityDao`]: routes entity writes into the bound transaction or
//!   straight to the store
//!
//! ## Example
//!
//! ```rust
//! use serde::Serialize;
//! use std::sync::Arc;
//! use txscope_core::{
//!     CoreResult, Entity, EntityDao, Propagation, Table, TransactionManagerFactory, Transactional,
//! };
//! use txscope_store::{InMemoryStore, ItemKey};
//!
//! #[derive(Serialize)]
//! struct Order {
//!     id: String,
//! }
//!
//! impl Entity for Order {
//!     fn key(&self) -> ItemKey {
//!         ItemKey::partition(self.id.clone())
//!     }
//! }
//!
//! let store = Arc::new(InMemoryStore::new());
//! let orders = EntityDao::new(Table::<Order>::new("orders"), store.clone());
//! let tx = Transactional::new(TransactionManagerFactory::new(store.clone()));
//!
//! tx.run(Propagation::Required, || -> CoreResult<()> {
//!     orders.save(&Order { id: "o-1".into() })?;
//!     orders.save(&Order { id: "o-2".into() })?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(store.transact_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dao;
mod error;
mod table;
mod transaction;
mod transactional;
mod types;

pub use config::{Config, NestedFailurePolicy};
pub use dao::EntityDao;
pub use error::{CoreError, CoreResult};
pub use table::{Entity, Table};
pub use transaction::{
    ContextGuard, RequestBuilder, TransactionContext, TransactionManager,
    TransactionManagerFactory,
};
pub use transactional::Transactional;
pub use types::{Propagation, TransactionAttribute, TransactionId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
