//! Atomic write request builder.

use txscope_store::{Item, ItemKey, TableName, WriteBatch, WriteOperation};

/// Accumulates write operations for one atomic multi-item write.
///
/// Operations keep the order in which they were added; `build` presents
/// them to the store in exactly that order.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    operations: Vec<WriteOperation>,
}

impl RequestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a put operation.
    pub fn add_put(&mut self, table: TableName, item: Item) -> &mut Self {
        self.operations.push(WriteOperation::Put { table, item });
        self
    }

    /// Appends a delete operation.
    pub fn add_delete(&mut self, table: TableName, key: ItemKey) -> &mut Self {
        self.operations.push(WriteOperation::Delete { table, key });
        self
    }

    /// Returns the recorded operations in order.
    #[must_use]
    pub fn operations(&self) -> &[WriteOperation] {
        &self.operations
    }

    /// Returns the number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Produces the batch payload for the store.
    #[must_use]
    pub fn build(&self) -> WriteBatch {
        WriteBatch::new(self.operations.clone())
    }
}
