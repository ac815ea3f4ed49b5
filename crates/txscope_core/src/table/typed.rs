//! Typed table implementation.

use crate::error::CoreResult;
use crate::table::entity::Entity;
use std::fmt;
use std::marker::PhantomData;
use txscope_store::{Item, ItemKey, TableName};

/// A typed reference to a store table.
///
/// `Table<T>` names the table and knows how to turn a `T` into the item
/// (or key) the store expects. It holds no connection and no data.
pub struct Table<T> {
    /// Store-side table name.
    name: TableName,
    /// Type marker.
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Table<T> {
    /// Creates a typed table handle.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: TableName::new(name),
            _marker: PhantomData,
        }
    }

    /// Returns the table name.
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Marshals an entity into a store item.
    pub fn to_item(&self, entity: &T) -> CoreResult<Item> {
        Ok(Item::new(entity.key(), entity.encode()?))
    }

    /// Returns the key an entity is stored under.
    pub fn key_of(&self, entity: &T) -> ItemKey {
        entity.key()
    }
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table").field("name", &self.name).finish()
    }
}
