//! Typed table handles.
//!
//! Provides `Table<T>` which marshals entities of type `T` into store
//! items with deterministic CBOR encoding via the `Entity` trait.

mod entity;
mod typed;

pub use entity::Entity;
pub use typed::Table;
