//! Transaction manager factory.

use crate::transaction::manager::TransactionManager;
use crate::transaction::request::RequestBuilder;
use std::sync::Arc;
use tracing::trace;
use txscope_store::StoreClient;

/// Produces a fresh, unshared [`TransactionManager`] per logical transaction.
///
/// Every manager returned by `create` is open, empty and wired to the same
/// store client. Managers are never pooled or reused.
#[derive(Clone)]
pub struct TransactionManagerFactory {
    client: Arc<dyn StoreClient>,
}

impl TransactionManagerFactory {
    /// Creates a factory for the given store client.
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self { client }
    }

    /// Returns the store client managers are wired to.
    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    /// Creates a new open manager with an empty request.
    pub fn create(&self) -> Arc<TransactionManager> {
        let manager = TransactionManager::new(Arc::clone(&self.client), RequestBuilder::new());
        trace!("[{}] Transaction manager created.", manager.id());
        Arc::new(manager)
    }
}

impl std::fmt::Debug for TransactionManagerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManagerFactory")
            .finish_non_exhaustive()
    }
}
