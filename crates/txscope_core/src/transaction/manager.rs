//! Transaction manager.

use crate::error::{CoreError, CoreResult};
use crate::table::{Entity, Table};
use crate::transaction::request::RequestBuilder;
use crate::types::TransactionId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};
use txscope_store::{StoreClient, WriteOperation};

/// Accumulates the writes of one logical transaction and submits them as
/// a single atomic multi-item write.
///
/// A manager is single-use:
/// - `save`/`delete` record operations until the manager is closed
/// - `commit` closes the manager exactly once, via compare-and-swap
/// - the store is contacted at most once, and only if something was
///   recorded
///
/// After `commit` returns, successfully or not, the manager is closed for
/// good. A failed store call is not retried.
pub struct TransactionManager {
    /// Correlation ID.
    id: TransactionId,
    /// Store that receives the batch on commit.
    client: Arc<dyn StoreClient>,
    /// Recorded operations. The lock also orders recording against closing.
    request: Mutex<RequestBuilder>,
    /// Set once, by the first `commit`.
    closed: AtomicBool,
    /// Set once the first operation has been recorded.
    committable: AtomicBool,
    /// Set when a `RequiresNew` transaction failed while this one was
    /// suspended.
    nested_failure: AtomicBool,
}

impl TransactionManager {
    /// Creates an open manager around an existing request builder.
    pub fn new(client: Arc<dyn StoreClient>, request: RequestBuilder) -> Self {
        let committable = !request.is_empty();
        Self {
            id: TransactionId::new(),
            client,
            request: Mutex::new(request),
            closed: AtomicBool::new(false),
            committable: AtomicBool::new(committable),
            nested_failure: AtomicBool::new(false),
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns true once `commit` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns true once at least one operation has been recorded.
    #[must_use]
    pub fn is_committable(&self) -> bool {
        self.committable.load(Ordering::Acquire)
    }

    /// Returns the number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.request.lock().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.request.lock().is_empty()
    }

    /// Returns a snapshot of the recorded operations, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<WriteOperation> {
        self.request.lock().operations().to_vec()
    }

    /// Records a put of `entity` into `table`.
    ///
    /// Nothing reaches the store until `commit`.
    pub fn save<T: Entity>(&self, table: &Table<T>, entity: &T) -> CoreResult<()> {
        self.ensure_open()?;
        let item = table.to_item(entity)?;
        self.record(|request| {
            request.add_put(table.name().clone(), item);
        })
    }

    /// Records a delete of `entity` from `table`.
    ///
    /// Nothing reaches the store until `commit`.
    pub fn delete<T: Entity>(&self, table: &Table<T>, entity: &T) -> CoreResult<()> {
        self.ensure_open()?;
        let key = table.key_of(entity);
        self.record(|request| {
            request.add_delete(table.name().clone(), key);
        })
    }

    /// Closes the manager and submits the recorded operations.
    ///
    /// # Errors
    ///
    /// - `AlreadyCommitted` if `commit` was called before, whatever its outcome
    /// - `EmptyTransaction` if nothing was recorded; the store is not contacted
    /// - `Store` if the atomic write failed; the manager stays closed
    pub fn commit(&self) -> CoreResult<()> {
        let batch = {
            let request = self.request.lock();

            if self
                .closed
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                warn!("[{}] Commit requested on a closed transaction.", self.id);
                return Err(CoreError::already_committed(self.id));
            }

            if !self.committable.load(Ordering::Acquire) {
                debug!("[{}] Nothing recorded. Transaction will not be sent.", self.id);
                return Err(CoreError::empty_transaction(self.id));
            }

            request.build()
        };

        debug!("[{}] Committing {} operation(s).", self.id, batch.len());

        self.client.transact_write_items(batch).map_err(|e| {
            error!("[{}] Atomic write failed: {}", self.id, e);
            CoreError::from(e)
        })?;

        debug!("[{}] Transaction committed.", self.id);
        Ok(())
    }

    /// Returns true if a nested `RequiresNew` transaction failed while this
    /// one was suspended.
    pub(crate) fn nested_failure_observed(&self) -> bool {
        self.nested_failure.load(Ordering::Acquire)
    }

    pub(crate) fn mark_nested_failure(&self) {
        self.nested_failure.store(true, Ordering::Release);
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_closed() {
            return Err(CoreError::already_committed(self.id));
        }
        Ok(())
    }

    fn record(&self, f: impl FnOnce(&mut RequestBuilder)) -> CoreResult<()> {
        let mut request = self.request.lock();
        // Checked again under the lock: commit closes while holding it.
        self.ensure_open()?;
        f(&mut request);
        self.committable.store(true, Ordering::Release);
        Ok(())
    }
}

impl std::fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .field("committable", &self.is_committable())
            .finish_non_exhaustive()
    }
}
