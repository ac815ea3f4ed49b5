//! # txscope Store
//!
//! Store client seam for txscope.
//!
//! This crate provides the lowest-level abstraction the transaction
//! coordinator talks to. A store is an **opaque item store** that offers
//! two write paths:
//!
//! - single-item `put_item` / `delete_item`, applied immediately
//! - `transact_write_items`, an all-or-nothing batch of put/delete operations
//!
//! ## Design Principles
//!
//! - Items arrive already marshalled (key + attribute bytes)
//! - The store owns atomicity; callers only assemble batches
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing, demos and ephemeral use
//!
//! ## Example
//!
//! ```rust
//! use txscope_store::{InMemoryStore, Item, ItemKey, StoreClient, TableName, WriteBatch, WriteOperation};
//!
//! let store = InMemoryStore::new();
//! let table = TableName::new("orders");
//! let batch = WriteBatch::new(vec![WriteOperation::Put {
//!     table: table.clone(),
//!     item: Item::new(ItemKey::partition("o-1"), vec![0xa0]),
//! }]);
//! store.transact_write_items(batch).unwrap();
//! assert_eq!(store.len(&table), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod memory;
mod model;

pub use client::StoreClient;
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, StoreCall, MAX_TRANSACT_ITEMS};
pub use model::{Item, ItemKey, TableName, WriteBatch, WriteOperation};
