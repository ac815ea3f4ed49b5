//! Coordinator configuration.

/// What an owning frame does when its body fails after a nested
/// `RequiresNew` transaction failed underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedFailurePolicy {
    /// The enclosing frame handles its own failure normally: nothing is
    /// committed.
    #[default]
    Propagate,
    /// The enclosing frame commits what it recorded before propagating the
    /// failure, if a nested `RequiresNew` frame failed while it was
    /// suspended. A nested frame fails when its body fails or its own
    /// commit fails.
    CommitEnclosing,
}

/// Configuration for [`crate::Transactional`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Skip the commit of an owning frame that recorded nothing, instead
    /// of failing with `EmptyTransaction`.
    pub allow_empty_transactions: bool,

    /// Failure handling across a `RequiresNew` boundary.
    pub nested_failure_policy: NestedFailurePolicy,
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether empty transactions are silently skipped.
    #[must_use]
    pub const fn allow_empty_transactions(mut self, value: bool) -> Self {
        self.allow_empty_transactions = value;
        self
    }

    /// Sets the nested failure policy.
    #[must_use]
    pub const fn nested_failure_policy(mut self, policy: NestedFailurePolicy) -> Self {
        self.nested_failure_policy = policy;
        self
    }
}
