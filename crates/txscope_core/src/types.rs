//! Core type definitions for txscope.

use std::fmt;
use uuid::Uuid;

/// Unique identifier for a transaction manager.
///
/// Assigned when the manager is created and used only to correlate log
/// lines and errors. It carries no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random transaction ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// How a transactional call relates to a transaction already bound to
/// the current call path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Propagation {
    /// Join the bound transaction, or start one if none is bound.
    #[default]
    Required,
    /// Always start an independent transaction, suspending any bound one
    /// until the call returns.
    RequiresNew,
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("REQUIRED"),
            Self::RequiresNew => f.write_str("REQUIRES_NEW"),
        }
    }
}

/// Marker attached to a transactional operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionAttribute {
    /// Propagation mode, `Required` unless set.
    pub propagation: Propagation,
}

impl TransactionAttribute {
    /// Creates an attribute with the given propagation.
    #[must_use]
    pub const fn new(propagation: Propagation) -> Self {
        Self { propagation }
    }

    /// Sets the propagation mode.
    #[must_use]
    pub const fn propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = propagation;
        self
    }
}

impl From<Propagation> for TransactionAttribute {
    fn from(propagation: Propagation) -> Self {
        Self::new(propagation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_ids_are_unique() {
        assert_ne!(TransactionId::new(), TransactionId::new());
    }

    #[test]
    fn transaction_id_display() {
        let id = TransactionId::new();
        let s = format!("{id}");
        assert!(s.starts_with("txn:"));
        assert_eq!(s.len(), "txn:".len() + 36);
    }

    #[test]
    fn attribute_defaults_to_required() {
        assert_eq!(TransactionAttribute::default().propagation, Propagation::Required);
        assert_eq!(
            TransactionAttribute::from(Propagation::RequiresNew).propagation,
            Propagation::RequiresNew
        );
    }

    #[test]
    fn propagation_display() {
        assert_eq!(Propagation::Required.to_string(), "REQUIRED");
        assert_eq!(Propagation::RequiresNew.to_string(), "REQUIRES_NEW");
    }
}
