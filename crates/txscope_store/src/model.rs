//! Write operation model shared by the store and the coordinator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of a store table.
///
/// Cheap to clone; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableName(Arc<str>);

impl TableName {
    /// Creates a table name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary key of an item: a partition key and an optional sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Partition (hash) key.
    pub partition: String,
    /// Sort (range) key, if the table declares one.
    pub sort: Option<String>,
}

impl ItemKey {
    /// Creates a key with only a partition component.
    #[must_use]
    pub fn partition(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    /// Creates a composite key.
    #[must_use]
    pub fn composite(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sort {
            Some(sort) => write!(f, "{}#{}", self.partition, sort),
            None => f.write_str(&self.partition),
        }
    }
}

/// A marshalled item: its key and its encoded attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Primary key.
    pub key: ItemKey,
    /// Encoded attributes (canonical CBOR when produced by txscope_core).
    pub attributes: Vec<u8>,
}

impl Item {
    /// Creates an item.
    #[must_use]
    pub fn new(key: ItemKey, attributes: Vec<u8>) -> Self {
        Self { key, attributes }
    }
}

/// A single operation inside an atomic multi-item write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteOperation {
    /// Insert or replace an item.
    Put {
        /// Target table.
        table: TableName,
        /// Item to write.
        item: Item,
    },
    /// Delete an item by key.
    Delete {
        /// Target table.
        table: TableName,
        /// Key of the item to delete.
        key: ItemKey,
    },
}

impl WriteOperation {
    /// Returns the table this operation targets.
    #[must_use]
    pub fn table(&self) -> &TableName {
        match self {
            Self::Put { table, .. } | Self::Delete { table, .. } => table,
        }
    }

    /// Returns the key of the item this operation targets.
    #[must_use]
    pub fn key(&self) -> &ItemKey {
        match self {
            Self::Put { item, .. } => &item.key,
            Self::Delete { key, .. } => key,
        }
    }

    /// Returns true for put operations.
    #[must_use]
    pub fn is_put(&self) -> bool {
        matches!(self, Self::Put { .. })
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put { table, item } => write!(f, "Put({table}, {})", item.key),
            Self::Delete { table, key } => write!(f, "Delete({table}, {key})"),
        }
    }
}

/// The ordered payload of an atomic multi-item write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBatch {
    operations: Vec<WriteOperation>,
}

impl WriteBatch {
    /// Creates a batch from an ordered list of operations.
    #[must_use]
    pub fn new(operations: Vec<WriteOperation>) -> Self {
        Self { operations }
    }

    /// Returns the operations in submission order.
    #[must_use]
    pub fn operations(&self) -> &[WriteOperation] {
        &self.operations
    }

    /// Returns the number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if the batch holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Consumes the batch, returning its operations.
    #[must_use]
    pub fn into_operations(self) -> Vec<WriteOperation> {
        self.operations
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOperation;
    type IntoIter = std::vec::IntoIter<WriteOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_key_display() {
        assert_eq!(ItemKey::partition("a").to_string(), "a");
        assert_eq!(ItemKey::composite("a", "b").to_string(), "a#b");
    }

    #[test]
    fn operation_accessors() {
        let table = TableName::new("t");
        let put = WriteOperation::Put {
            table: table.clone(),
            item: Item::new(ItemKey::partition("k1"), vec![1]),
        };
        let delete = WriteOperation::Delete {
            table: table.clone(),
            key: ItemKey::partition("k2"),
        };

        assert!(put.is_put());
        assert!(!delete.is_put());
        assert_eq!(put.table(), &table);
        assert_eq!(delete.key(), &ItemKey::partition("k2"));
        assert_eq!(put.to_string(), "Put(t, k1)");
        assert_eq!(delete.to_string(), "Delete(t, k2)");
    }

    #[test]
    fn batch_preserves_order() {
        let table = TableName::new("t");
        let ops: Vec<_> = (0..5)
            .map(|i| WriteOperation::Delete {
                table: table.clone(),
                key: ItemKey::partition(format!("k{i}")),
            })
            .collect();

        let batch = WriteBatch::new(ops.clone());
        assert_eq!(batch.len(), 5);
        assert_eq!(batch.operations(), ops.as_slice());
        assert_eq!(batch.into_operations(), ops);
    }
}
