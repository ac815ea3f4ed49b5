//! Store client trait definition.

use crate::error::StoreResult;
use crate::model::{Item, ItemKey, TableName, WriteBatch};

/// A client for a key-value store with an atomic multi-item write.
///
/// The coordinator never interprets what the store does with the items it
/// receives. It only decides which path a write takes:
///
/// - the direct path (`put_item`, `delete_item`), used when no transaction
///   is bound to the current call path
/// - the transactional path (`transact_write_items`), used once per
///   committed transaction manager
///
/// # Invariants
///
/// - `transact_write_items` is all-or-nothing: either every operation in
///   the batch is applied or none is
/// - Operations in a batch are presented in the order they were recorded
/// - Clients must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
pub trait StoreClient: Send + Sync {
    /// Writes a single item, replacing any item with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or cannot perform the write.
    fn put_item(&self, table: &TableName, item: Item) -> StoreResult<()>;

    /// Deletes a single item by key.
    ///
    /// Deleting a missing item is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or cannot perform the delete.
    fn delete_item(&self, table: &TableName, key: ItemKey) -> StoreResult<()>;

    /// Executes a batch of write operations as one indivisible unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is rejected or canceled. In that case
    /// none of its operations were applied.
    fn transact_write_items(&self, batch: WriteBatch) -> StoreResult<()>;
}
