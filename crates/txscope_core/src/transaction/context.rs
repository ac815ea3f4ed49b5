//! Per-thread binding of the active transaction manager.

use crate::transaction::manager::TransactionManager;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

thread_local! {
    static CURRENT: RefCell<Option<Arc<TransactionManager>>> = const { RefCell::new(None) };
}

/// Access to the transaction manager bound to the current call path.
///
/// The binding lives in thread-local storage, so a call stack only ever
/// sees the manager bound by its own enclosing frames. Bindings follow
/// stack discipline: [`TransactionContext::bind`] returns a guard that
/// restores whatever was bound before when it is dropped, including
/// during unwinding.
#[derive(Debug, Clone, Copy)]
pub struct TransactionContext;

impl TransactionContext {
    /// Returns the manager bound to this call path, if any.
    #[must_use]
    pub fn current() -> Option<Arc<TransactionManager>> {
        CURRENT.with(|current| current.borrow().clone())
    }

    /// Returns true if a manager is bound to this call path.
    #[must_use]
    pub fn is_bound() -> bool {
        CURRENT.with(|current| current.borrow().is_some())
    }

    /// Binds `manager` to this call path until the returned guard is dropped.
    ///
    /// Any manager bound before is suspended and restored by the guard.
    pub fn bind(manager: Arc<TransactionManager>) -> ContextGuard {
        let previous = CURRENT.with(|current| current.replace(Some(Arc::clone(&manager))));
        ContextGuard {
            bound: manager,
            previous,
            _not_send: PhantomData,
        }
    }
}

/// Restores the previous binding when dropped.
///
/// The guard cannot leave the thread that created it.
#[must_use = "the binding is released as soon as the guard is dropped"]
pub struct ContextGuard {
    bound: Arc<TransactionManager>,
    previous: Option<Arc<TransactionManager>>,
    _not_send: PhantomData<*const ()>,
}

impl ContextGuard {
    /// Returns the manager this guard bound.
    #[must_use]
    pub fn manager(&self) -> &Arc<TransactionManager> {
        &self.bound
    }

    /// Returns the manager suspended by this binding, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Arc<TransactionManager>> {
        self.previous.as_ref()
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // The slot may already be gone during thread teardown.
        let _ = CURRENT.try_with(|current| {
            let replaced = current.replace(previous);
            if !replaced.is_some_and(|m| Arc::ptr_eq(&m, &self.bound)) {
                warn!("[{}] Binding released out of order.", self.bound.id());
            }
        });
    }
}

impl std::fmt::Debug for ContextGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextGuard")
            .field("bound", &self.bound.id())
            .field("previous", &self.previous.as_ref().map(|m| m.id()))
            .finish()
    }
}
