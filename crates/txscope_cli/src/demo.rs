//! Demo domain: account transfers with an audit trail.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use txscope_core::{
    Config, CoreError, Entity, EntityDao, Propagation, Table, TransactionManagerFactory,
    Transactional,
};
use txscope_store::{InMemoryStore, ItemKey};

/// Errors raised by the demo services.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Transaction coordination failed.
    #[error(transparent)]
    Tx(#[from] CoreError),

    /// The audit service refused an entry.
    #[error("audit rejected: {0}")]
    Rejected(String),
}

/// A bank account.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: String,
    pub balance: i64,
}

impl Account {
    pub fn new(id: &str, balance: i64) -> Self {
        Self {
            id: id.to_string(),
            balance,
        }
    }
}

impl Entity for Account {
    fn key(&self) -> ItemKey {
        ItemKey::partition(self.id.clone())
    }
}

/// One audit trail line, keyed by account and sequence number.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub account: String,
    pub seq: u32,
    pub message: String,
}

impl Entity for AuditEntry {
    fn key(&self) -> ItemKey {
        ItemKey::composite(self.account.clone(), format!("{:06}", self.seq))
    }
}

/// How the audit step behaves during a transfer.
#[derive(Debug, Clone, Copy)]
pub struct AuditMode {
    pub propagation: Propagation,
    pub reject: bool,
}

/// Transfer and audit services over one in-memory store.
pub struct Bank {
    pub store: Arc<InMemoryStore>,
    pub tx: Transactional,
    pub accounts: EntityDao<Account>,
    pub audit: EntityDao<AuditEntry>,
}

impl Bank {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let factory = TransactionManagerFactory::new(store.clone());
        Self {
            tx: Transactional::with_config(factory, config),
            accounts: EntityDao::new(Table::new("accounts"), store.clone()),
            audit: EntityDao::new(Table::new("audit"), store.clone()),
            store,
        }
    }

    /// Moves `amount` between two accounts, auditing the move.
    ///
    /// Both balances are written in one transaction. The audit entry joins
    /// it or runs on its own depending on `mode`.
    pub fn transfer(
        &self,
        from: &mut Account,
        to: &mut Account,
        amount: i64,
        mode: AuditMode,
    ) -> Result<(), DemoError> {
        self.tx.required(|| {
            from.balance -= amount;
            to.balance += amount;
            self.accounts.save(from)?;
            self.accounts.save(to)?;

            let entry = AuditEntry {
                account: from.id.clone(),
                seq: 1,
                message: format!("moved {amount} to {}", to.id),
            };
            self.record(&entry, mode)
        })
    }

    fn record(&self, entry: &AuditEntry, mode: AuditMode) -> Result<(), DemoError> {
        self.tx.run(mode.propagation, || {
            self.audit.save(entry)?;
            if mode.reject {
                return Err(DemoError::Rejected(entry.message.clone()));
            }
            Ok(())
        })
    }
}
