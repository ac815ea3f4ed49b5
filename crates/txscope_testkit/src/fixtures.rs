//! Test fixtures and harness helpers.
//!
//! Provides a test entity and a ready-wired coordinator over an
//! [`InMemoryStore`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use txscope_core::{Config, Entity, EntityDao, Table, TransactionManagerFactory, Transactional};
use txscope_store::{InMemoryStore, ItemKey, TableName, WriteOperation};

/// Table used by the fixtures.
pub const TEST_TABLE: &str = "TestTable";

/// A minimal entity keyed by partition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEntity {
    /// Partition key.
    pub partition_key: String,
    /// Payload.
    pub value: String,
}

impl TestEntity {
    /// Creates a test entity.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            partition_key: key.into(),
            value: value.into(),
        }
    }
}

impl Entity for TestEntity {
    fn key(&self) -> ItemKey {
        ItemKey::partition(self.partition_key.clone())
    }
}

/// A coordinator wired to a fresh in-memory store.
pub struct TestHarness {
    /// The store every write ends up in.
    pub store: Arc<InMemoryStore>,
    /// The transactional wrapper.
    pub tx: Transactional,
    /// Facade for [`TestEntity`] writes on [`TEST_TABLE`].
    pub dao: EntityDao<TestEntity>,
}

impl TestHarness {
    /// Creates a harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a harness with the given configuration.
    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let factory = TransactionManagerFactory::new(store.clone());
        Self {
            tx: Transactional::with_config(factory, config),
            dao: EntityDao::new(Table::new(TEST_TABLE), store.clone()),
            store,
        }
    }

    /// Returns the fixture table name.
    pub fn table_name(&self) -> TableName {
        TableName::new(TEST_TABLE)
    }

    /// Reads back a stored entity, decoding its attributes.
    pub fn stored(&self, key: &str) -> Option<TestEntity> {
        let bytes = self.store.get(&self.table_name(), &ItemKey::partition(key))?;
        ciborium::from_reader(bytes.as_slice()).ok()
    }

    /// Returns the partition keys of every atomic write, in arrival order.
    pub fn transact_keys(&self) -> Vec<Vec<String>> {
        self.store
            .transact_calls()
            .iter()
            .map(|batch| operation_keys(batch))
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the partition keys of `operations`, in order.
pub fn operation_keys(operations: &[WriteOperation]) -> Vec<String> {
    operations
        .iter()
        .map(|op| op.key().partition.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_decodes_committed_entity() {
        let harness = TestHarness::new();
        let entity = TestEntity::new("key1", "val1");

        harness.dao.save(&entity).unwrap();

        assert_eq!(harness.stored("key1"), Some(entity));
        assert_eq!(harness.stored("missing"), None);
    }

    #[test]
    fn transact_keys_empty_without_transactions() {
        let harness = TestHarness::new();
        assert!(harness.transact_keys().is_empty());
    }
}
