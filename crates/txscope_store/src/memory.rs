//! In-memory store for testing.

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use crate::model::{Item, ItemKey, TableName, WriteBatch, WriteOperation};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Maximum number of operations accepted in one atomic write.
pub const MAX_TRANSACT_ITEMS: usize = 100;

/// A call received by an [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum StoreCall {
    /// A direct single-item put.
    PutItem {
        /// Target table.
        table: TableName,
        /// Key of the written item.
        key: ItemKey,
    },
    /// A direct single-item delete.
    DeleteItem {
        /// Target table.
        table: TableName,
        /// Key of the deleted item.
        key: ItemKey,
    },
    /// An atomic multi-item write.
    TransactWriteItems {
        /// Operations in submission order.
        operations: Vec<WriteOperation>,
    },
}

impl StoreCall {
    /// Returns true for atomic multi-item writes.
    #[must_use]
    pub fn is_transact(&self) -> bool {
        matches!(self, Self::TransactWriteItems { .. })
    }
}

type Table = BTreeMap<ItemKey, Vec<u8>>;

/// An in-memory store.
///
/// This store keeps all items in memory and is suitable for:
/// - Unit and integration tests
/// - Demos
/// - Ephemeral use that doesn't need persistence
///
/// Every call it receives is recorded, whether it succeeds or not, so
/// tests can assert how many times and in which order the store was
/// contacted.
///
/// Atomic writes are validated in full before anything is applied, then
/// applied under a single write lock.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use txscope_store::{InMemoryStore, Item, ItemKey, StoreClient, TableName};
///
/// let store = InMemoryStore::new();
/// let table = TableName::new("users");
/// store.put_item(&table, Item::new(ItemKey::partition("u-1"), vec![0xa0])).unwrap();
/// assert!(store.get(&table, &ItemKey::partition("u-1")).is_some());
/// assert_eq!(store.calls().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<TableName, Table>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_next_transact: Mutex<Option<StoreError>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the attributes of an item, if present.
    #[must_use]
    pub fn get(&self, table: &TableName, key: &ItemKey) -> Option<Vec<u8>> {
        self.tables
            .read()
            .get(table)
            .and_then(|items| items.get(key).cloned())
    }

    /// Returns the number of items in a table.
    #[must_use]
    pub fn len(&self, table: &TableName) -> usize {
        self.tables.read().get(table).map_or(0, BTreeMap::len)
    }

    /// Returns true if the table holds no items.
    #[must_use]
    pub fn is_empty(&self, table: &TableName) -> bool {
        self.len(table) == 0
    }

    /// Returns a copy of every call received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Returns the atomic multi-item writes received so far.
    #[must_use]
    pub fn transact_calls(&self) -> Vec<Vec<WriteOperation>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StoreCall::TransactWriteItems { operations } => Some(operations.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of atomic multi-item writes received so far.
    #[must_use]
    pub fn transact_count(&self) -> usize {
        self.calls.lock().iter().filter(|c| c.is_transact()).count()
    }

    /// Makes the next atomic write fail with `error` without applying it.
    pub fn fail_next_transact(&self, error: StoreError) {
        *self.fail_next_transact.lock() = Some(error);
    }

    /// Clears all items and the call log.
    pub fn clear(&self) {
        self.tables.write().clear();
        self.calls.lock().clear();
        *self.fail_next_transact.lock() = None;
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }

    fn validate(batch: &WriteBatch) -> StoreResult<()> {
        if batch.is_empty() {
            return Err(StoreError::Validation(
                "transaction request cannot be empty".into(),
            ));
        }

        if batch.len() > MAX_TRANSACT_ITEMS {
            return Err(StoreError::Validation(format!(
                "transaction request has {} operations, at most {} are allowed",
                batch.len(),
                MAX_TRANSACT_ITEMS
            )));
        }

        let mut seen = HashSet::with_capacity(batch.len());
        for op in batch.operations() {
            if !seen.insert((op.table(), op.key())) {
                return Err(StoreError::Validation(format!(
                    "transaction request cannot include multiple operations on one item: {} {}",
                    op.table(),
                    op.key()
                )));
            }
        }

        Ok(())
    }
}

impl StoreClient for InMemoryStore {
    fn put_item(&self, table: &TableName, item: Item) -> StoreResult<()> {
        self.record(StoreCall::PutItem {
            table: table.clone(),
            key: item.key.clone(),
        });

        self.tables
            .write()
            .entry(table.clone())
            .or_default()
            .insert(item.key, item.attributes);
        Ok(())
    }

    fn delete_item(&self, table: &TableName, key: ItemKey) -> StoreResult<()> {
        self.record(StoreCall::DeleteItem {
            table: table.clone(),
            key: key.clone(),
        });

        if let Some(items) = self.tables.write().get_mut(table) {
            items.remove(&key);
        }
        Ok(())
    }

    fn transact_write_items(&self, batch: WriteBatch) -> StoreResult<()> {
        self.record(StoreCall::TransactWriteItems {
            operations: batch.operations().to_vec(),
        });

        if let Some(error) = self.fail_next_transact.lock().take() {
            return Err(error);
        }

        Self::validate(&batch)?;

        let mut tables = self.tables.write();
        for op in batch {
            match op {
                WriteOperation::Put { table, item } => {
                    tables
                        .entry(table)
                        .or_default()
                        .insert(item.key, item.attributes);
                }
                WriteOperation::Delete { table, key } => {
                    if let Some(items) = tables.get_mut(&table) {
                        items.remove(&key);
                    }
                }
            }
        }

        Ok(())
    }
}
