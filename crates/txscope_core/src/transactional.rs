//! Propagation-aware wrapper for transactional operations.

use crate::config::{Config, NestedFailurePolicy};
use crate::error::CoreError;
use crate::transaction::{TransactionContext, TransactionManager, TransactionManagerFactory};
use crate::types::{Propagation, TransactionAttribute};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Runs operations inside client-side transactions.
///
/// `Transactional` decides, per call, whether the call joins the
/// transaction bound to the current call path or gets its own:
///
/// | Propagation   | Bound manager      | Action                                         |
/// |---------------|--------------------|------------------------------------------------|
/// | `Required`    | yes                | join it; commit is left to the frame owning it |
/// | `Required`    | no                 | create, bind, run, commit on success           |
/// | `RequiresNew` | either             | create, bind over the existing one, run, commit on success, restore |
///
/// A frame that created a manager owns it and is the only frame that
/// commits it. When the wrapped operation fails, the owner does not commit
/// and returns the failure unchanged. The previous binding is restored on
/// every exit path, including panics.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use txscope_core::{CoreResult, Propagation, TransactionContext, TransactionManagerFactory, Transactional};
/// use txscope_store::InMemoryStore;
///
/// let tx = Transactional::new(TransactionManagerFactory::new(Arc::new(InMemoryStore::new())));
///
/// let outer_and_inner = tx.run(Propagation::Required, || -> CoreResult<_> {
///     let outer = TransactionContext::current().unwrap().id();
///     let inner = tx.run(Propagation::RequiresNew, || -> CoreResult<_> {
///         Ok(TransactionContext::current().unwrap().id())
///     });
///     Ok((outer, inner))
/// });
/// // Neither frame recorded anything, so both commits report an empty transaction.
/// assert!(outer_and_inner.unwrap_err().is_empty_transaction());
/// ```
#[derive(Debug, Clone)]
pub struct Transactional {
    factory: TransactionManagerFactory,
    config: Config,
}

impl Transactional {
    /// Creates a wrapper with the default configuration.
    pub fn new(factory: TransactionManagerFactory) -> Self {
        Self::with_config(factory, Config::default())
    }

    /// Creates a wrapper with the given configuration.
    pub fn with_config(factory: TransactionManagerFactory, config: Config) -> Self {
        Self { factory, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the factory new managers come from.
    pub fn factory(&self) -> &TransactionManagerFactory {
        &self.factory
    }

    /// Runs `body` under the given transaction attribute.
    ///
    /// Failures from `body` are returned as-is. Failures of the owning
    /// frame's commit are converted with `From<CoreError>`.
    pub fn run<R, E, F>(&self, attribute: impl Into<TransactionAttribute>, body: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<CoreError>,
    {
        match attribute.into().propagation {
            Propagation::Required => {
                if let Some(current) = TransactionContext::current() {
                    debug!("[{}] Transaction already in progress.", current.id());
                    return body();
                }
                self.run_owned(body)
            }
            Propagation::RequiresNew => {
                if let Some(current) = TransactionContext::current() {
                    debug!(
                        "[{}] Suspending transaction for a nested transaction.",
                        current.id()
                    );
                }
                self.run_owned(body)
            }
        }
    }

    /// Shorthand for `run(Propagation::Required, body)`.
    pub fn required<R, E, F>(&self, body: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<CoreError>,
    {
        self.run(Propagation::Required, body)
    }

    /// Shorthand for `run(Propagation::RequiresNew, body)`.
    pub fn requires_new<R, E, F>(&self, body: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<CoreError>,
    {
        self.run(Propagation::RequiresNew, body)
    }

    /// Wraps `f` into a function of the same signature that runs every call
    /// under the given transaction attribute.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use txscope_core::{CoreResult, Propagation, TransactionContext, TransactionManagerFactory, Transactional};
    /// use txscope_store::InMemoryStore;
    ///
    /// let tx = Transactional::new(TransactionManagerFactory::new(Arc::new(InMemoryStore::new())));
    /// let bound = tx.wrap(Propagation::Required, |n: u32| -> CoreResult<bool> {
    ///     Ok(n > 0 && TransactionContext::is_bound())
    /// });
    ///
    /// // The wrapped function recorded nothing, so its own commit fails.
    /// assert!(bound(1).unwrap_err().is_empty_transaction());
    /// ```
    pub fn wrap<A, R, E, F>(
        &self,
        attribute: impl Into<TransactionAttribute>,
        f: F,
    ) -> impl Fn(A) -> Result<R, E>
    where
        F: Fn(A) -> Result<R, E>,
        E: From<CoreError>,
    {
        let tx = self.clone();
        let attribute = attribute.into();
        move |arg: A| tx.run(attribute, || f(arg))
    }

    /// Creates, binds and owns a manager for the extent of `body`.
    fn run_owned<R, E, F>(&self, body: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<CoreError>,
    {
        let manager = self.factory.create();
        let guard = TransactionContext::bind(Arc::clone(&manager));
        debug!("[{}] Starting transaction.", manager.id());

        match body() {
            Ok(value) => match self.finish::<CoreError>(&manager) {
                Ok(()) => Ok(value),
                Err(e) => {
                    // A failed commit counts as a failure of this frame.
                    if let Some(suspended) = guard.previous() {
                        suspended.mark_nested_failure();
                    }
                    Err(E::from(e))
                }
            },
            Err(err) => {
                warn!(
                    "[{}] Operation failed. Transaction will not be committed.",
                    manager.id()
                );
                if let Some(suspended) = guard.previous() {
                    suspended.mark_nested_failure();
                }
                if self.config.nested_failure_policy == NestedFailurePolicy::CommitEnclosing
                    && manager.nested_failure_observed()
                {
                    self.commit_after_nested_failure(&manager);
                }
                Err(err)
            }
        }
    }

    fn finish<E: From<CoreError>>(&self, manager: &TransactionManager) -> Result<(), E> {
        if self.config.allow_empty_transactions && !manager.is_committable() {
            debug!("[{}] Nothing recorded. Skipping commit.", manager.id());
            return Ok(());
        }
        manager.commit().map_err(E::from)
    }

    fn commit_after_nested_failure(&self, manager: &TransactionManager) {
        debug!(
            "[{}] Nested transaction failed. Committing enclosing transaction.",
            manager.id()
        );
        if let Err(e) = self.finish::<CoreError>(manager) {
            error!(
                "[{}] Enclosing commit after nested failure failed: {}",
                manager.id(),
                e
            );
        }
    }
}
