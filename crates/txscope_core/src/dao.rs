//! Entity data access facade.

use crate::error::CoreResult;
use crate::table::{Entity, Table};
use crate::transaction::TransactionContext;
use std::sync::Arc;
use tracing::{debug, trace};
use txscope_store::StoreClient;

/// Writes entities of one table, inside or outside a transaction.
///
/// When a transaction is bound to the current call path, `save` and
/// `delete` are recorded in it and reach the store on its commit.
/// Otherwise they go straight to the store as single-item writes.
///
/// # Example
///
/// ```rust,ignore
/// let users: EntityDao<User> = EntityDao::new(Table::new("users"), store.clone());
///
/// // No transaction bound: written immediately.
/// users.save(&alice)?;
///
/// // Inside a transaction: deferred until the owning frame commits.
/// tx.required(|| {
///     users.save(&bob)?;
///     users.delete(&alice)
/// })?;
/// ```
pub struct EntityDao<T: Entity> {
    /// Target table.
    table: Table<T>,
    /// Store for the direct path.
    client: Arc<dyn StoreClient>,
}

impl<T: Entity> EntityDao<T> {
    /// Creates a facade over `table`.
    pub fn new(table: Table<T>, client: Arc<dyn StoreClient>) -> Self {
        Self { table, client }
    }

    /// Returns the table this facade writes to.
    pub fn table(&self) -> &Table<T> {
        &self.table
    }

    /// Saves an entity.
    ///
    /// Deferred when a transaction is bound, immediate otherwise.
    pub fn save(&self, entity: &T) -> CoreResult<()> {
        match TransactionContext::current() {
            Some(manager) => manager.save(&self.table, entity),
            None => {
                let item = self.table.to_item(entity)?;
                trace!("Put {} {} outside a transaction.", self.table.name(), item.key);
                self.client.put_item(self.table.name(), item)?;
                Ok(())
            }
        }
    }

    /// Deletes an entity.
    ///
    /// Deferred when a transaction is bound, immediate otherwise.
    pub fn delete(&self, entity: &T) -> CoreResult<()> {
        match TransactionContext::current() {
            Some(manager) => manager.delete(&self.table, entity),
            None => {
                let key = self.table.key_of(entity);
                trace!("Delete {} {} outside a transaction.", self.table.name(), key);
                self.client.delete_item(self.table.name(), key)?;
                Ok(())
            }
        }
    }

    /// Does not commit anything.
    ///
    /// Only the frame that created a transaction commits it; a participant
    /// calling this cannot end the transaction early. Without a bound
    /// transaction there is nothing to commit either.
    pub fn commit(&self) -> CoreResult<()> {
        if let Some(manager) = TransactionContext::current() {
            debug!(
                "[{}] Commit requested by a participant. Left to the owning frame.",
                manager.id()
            );
        }
        Ok(())
    }
}

impl<T: Entity> std::fmt::Debug for EntityDao<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDao")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
