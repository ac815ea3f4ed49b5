//! Propagation scenarios across nested transactional calls.

use std::sync::Arc;
use txscope_core::{
    Config, CoreError, CoreResult, NestedFailurePolicy, Propagation, TransactionAttribute,
    TransactionContext, Transactional,
};
use txscope_store::{StoreCall, StoreError};
use txscope_testkit::{TestEntity, TestHarness};

/// Application error used by the services below.
#[derive(Debug)]
enum ServiceError {
    Tx(CoreError),
    Business(&'static str),
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        Self::Tx(e)
    }
}

/// Repository-style service with transactional methods, called from
/// [`OuterService`].
struct InnerService<'a> {
    harness: &'a TestHarness,
}

impl InnerService<'_> {
    fn save(&self, entity: &TestEntity) -> Result<(), ServiceError> {
        self.harness
            .tx
            .run(TransactionAttribute::default(), || Ok(self.harness.dao.save(entity)?))
    }

    fn save_requires_new(&self, entity: &TestEntity) -> Result<(), ServiceError> {
        self.harness
            .tx
            .run(Propagation::RequiresNew, || Ok(self.harness.dao.save(entity)?))
    }

    fn save_requires_new_then_fail(&self, entity: &TestEntity) -> Result<(), ServiceError> {
        self.harness.tx.run(Propagation::RequiresNew, || {
            self.harness.dao.save(entity)?;
            Err(ServiceError::Business("inner rejected"))
        })
    }
}

struct OuterService<'a> {
    harness: &'a TestHarness,
    inner: InnerService<'a>,
}

impl<'a> OuterService<'a> {
    fn new(harness: &'a TestHarness) -> Self {
        Self {
            harness,
            inner: InnerService { harness },
        }
    }

    fn tx(&self) -> &Transactional {
        &self.harness.tx
    }

    fn save(&self, entity: &TestEntity) -> Result<(), ServiceError> {
        self.tx().required(|| Ok(self.harness.dao.save(entity)?))
    }

    fn delete(&self, entity: &TestEntity) -> Result<(), ServiceError> {
        self.tx().required(|| Ok(self.harness.dao.delete(entity)?))
    }

    fn nested_required(&self, e1: &TestEntity, e2: &TestEntity) -> Result<(), ServiceError> {
        self.tx().required(|| {
            self.harness.dao.save(e1)?;
            self.inner.save(e2)
        })
    }

    fn nested_requires_new(&self, e1: &TestEntity, e2: &TestEntity) -> Result<(), ServiceError> {
        self.tx().required(|| {
            self.harness.dao.save(e1)?;
            self.inner.save_requires_new(e2)
        })
    }

    fn nested_requires_new_failing(
        &self,
        e1: &TestEntity,
        e2: &TestEntity,
    ) -> Result<(), ServiceError> {
        self.tx().required(|| {
            self.harness.dao.save(e1)?;
            self.inner.save_requires_new_then_fail(e2)
        })
    }

    fn nested_requires_new_failure_handled(
        &self,
        e1: &TestEntity,
        e2: &TestEntity,
    ) -> Result<(), ServiceError> {
        self.tx().required(|| {
            self.harness.dao.save(e1)?;
            if let Err(ServiceError::Business(reason)) = self.inner.save_requires_new_then_fail(e2)
            {
                assert_eq!(reason, "inner rejected");
            }
            Ok(())
        })
    }
}

fn e(n: u32) -> TestEntity {
    TestEntity::new(format!("key{n}"), format!("val{n}"))
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

#[test]
fn adds_item_to_the_transaction_and_commits_it() {
    let harness = TestHarness::new();
    OuterService::new(&harness).save(&e(1)).unwrap();

    assert_eq!(harness.transact_keys(), vec![keys(&["key1"])]);
    assert_eq!(harness.stored("key1"), Some(e(1)));
}

#[test]
fn adds_delete_item_to_the_transaction_and_commits_it() {
    let harness = TestHarness::new();
    harness.dao.save(&e(1)).unwrap();

    OuterService::new(&harness).delete(&e(1)).unwrap();

    let calls = harness.store.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], StoreCall::PutItem { .. }));
    match &calls[1] {
        StoreCall::TransactWriteItems { operations } => {
            assert_eq!(operations.len(), 1);
            assert!(!operations[0].is_put());
        }
        other => panic!("expected atomic write, got {other:?}"),
    }
    assert_eq!(harness.stored("key1"), None);
}

#[test]
fn scenario_a_required_inside_required_shares_one_write() {
    let harness = TestHarness::new();

    OuterService::new(&harness)
        .nested_required(&e(1), &e(2))
        .unwrap();

    assert_eq!(harness.transact_keys(), vec![keys(&["key1", "key2"])]);
    let ops = &harness.store.transact_calls()[0];
    assert!(ops.iter().all(|op| op.is_put()));
}

#[test]
fn scenario_b_requires_new_commits_before_enclosing() {
    let harness = TestHarness::new();

    OuterService::new(&harness)
        .nested_requires_new(&e(1), &e(2))
        .unwrap();

    assert_eq!(
        harness.transact_keys(),
        vec![keys(&["key2"]), keys(&["key1"])]
    );
}

#[test]
fn requires_new_uses_a_distinct_manager() {
    let harness = TestHarness::new();
    let tx = &harness.tx;

    tx.required(|| {
        let outer = TransactionContext::current().unwrap();
        harness.dao.save(&e(1))?;
        tx.requires_new(|| {
            let inner = TransactionContext::current().unwrap();
            assert!(!Arc::ptr_eq(&outer, &inner));
            assert_ne!(outer.id(), inner.id());
            harness.dao.save(&e(2))
        })?;
        assert!(!outer.is_closed());
        Ok::<_, CoreError>(())
    })
    .unwrap();
}

#[test]
fn requires_new_performs_as_required_without_active_transaction() {
    let harness = TestHarness::new();

    OuterService::new(&harness)
        .inner
        .save_requires_new(&e(1))
        .unwrap();

    assert_eq!(harness.transact_keys(), vec![keys(&["key1"])]);
}

#[test]
fn scenario_c_second_commit_is_rejected() {
    let harness = TestHarness::new();
    let manager = harness.tx.factory().create();
    manager.save(harness.dao.table(), &e(1)).unwrap();

    manager.commit().unwrap();
    let second = manager.commit();

    assert!(matches!(second, Err(CoreError::AlreadyCommitted { .. })));
    assert_eq!(harness.store.transact_count(), 1);
}

#[test]
fn scenario_d_empty_commit_never_contacts_store() {
    let harness = TestHarness::new();
    let manager = harness.tx.factory().create();

    let result = manager.commit();

    assert!(matches!(result, Err(CoreError::EmptyTransaction { .. })));
    assert!(harness.store.calls().is_empty());
}

#[test]
fn nested_failure_propagates_and_nothing_is_written() {
    let harness = TestHarness::new();

    let result = OuterService::new(&harness).nested_requires_new_failing(&e(1), &e(2));

    assert!(matches!(result, Err(ServiceError::Business("inner rejected"))));
    assert!(harness.store.calls().is_empty());
    assert!(!TransactionContext::is_bound());
}

#[test]
fn handled_nested_failure_does_not_stop_outer_commit() {
    let harness = TestHarness::new();

    OuterService::new(&harness)
        .nested_requires_new_failure_handled(&e(1), &e(2))
        .unwrap();

    assert_eq!(harness.transact_keys(), vec![keys(&["key1"])]);
    assert_eq!(harness.stored("key2"), None);
}

#[test]
fn commit_enclosing_policy_commits_outer_on_nested_failure() {
    let harness = TestHarness::with_config(
        Config::new().nested_failure_policy(NestedFailurePolicy::CommitEnclosing),
    );

    let result = OuterService::new(&harness).nested_requires_new_failing(&e(1), &e(2));

    assert!(matches!(result, Err(ServiceError::Business(_))));
    assert_eq!(harness.transact_keys(), vec![keys(&["key1"])]);
    assert_eq!(harness.stored("key1"), Some(e(1)));
}

#[test]
fn commit_enclosing_policy_commits_outer_when_nested_commit_fails() {
    let harness = TestHarness::with_config(
        Config::new().nested_failure_policy(NestedFailurePolicy::CommitEnclosing),
    );
    let tx = &harness.tx;

    let result = tx.required(|| {
        harness.dao.save(&e(1))?;
        harness
            .store
            .fail_next_transact(StoreError::Unavailable("down".into()));
        let nested = tx.requires_new(|| harness.dao.save(&e(2)));
        assert!(matches!(
            nested,
            Err(CoreError::Store(StoreError::Unavailable(_)))
        ));
        Err::<(), _>(ServiceError::Business("outer rejected"))
    });

    assert!(matches!(result, Err(ServiceError::Business("outer rejected"))));
    assert_eq!(
        harness.transact_keys(),
        vec![keys(&["key2"]), keys(&["key1"])]
    );
    assert_eq!(harness.stored("key1"), Some(e(1)));
    assert_eq!(harness.stored("key2"), None);
}

#[test]
fn failed_nested_commit_leaves_outer_uncommitted_by_default() {
    let harness = TestHarness::new();
    let tx = &harness.tx;

    let result = tx.required(|| {
        harness.dao.save(&e(1))?;
        harness
            .store
            .fail_next_transact(StoreError::Unavailable("down".into()));
        tx.requires_new(|| harness.dao.save(&e(2)))?;
        Ok::<_, ServiceError>(())
    });

    assert!(matches!(
        result,
        Err(ServiceError::Tx(CoreError::Store(StoreError::Unavailable(_))))
    ));
    assert_eq!(harness.store.transact_count(), 1);
    assert_eq!(harness.stored("key1"), None);
}

#[test]
fn store_rejection_surfaces_from_owning_frame() {
    let harness = TestHarness::new();

    // Two writes to one item in one atomic write are rejected by the store.
    let result = OuterService::new(&harness).nested_required(&e(1), &e(1));

    assert!(matches!(
        result,
        Err(ServiceError::Tx(CoreError::Store(StoreError::Validation(_))))
    ));
    assert_eq!(harness.store.transact_count(), 1);
    assert_eq!(harness.stored("key1"), None);
}

#[test]
fn direct_writes_outside_transactions() {
    let harness = TestHarness::new();

    harness.dao.save(&e(1)).unwrap();
    harness.dao.delete(&e(1)).unwrap();

    assert_eq!(harness.store.transact_count(), 0);
    assert_eq!(harness.store.calls().len(), 2);
}

#[test]
fn wrapped_function_joins_outer_transaction() {
    let harness = TestHarness::new();
    let save_one = harness
        .tx
        .wrap(Propagation::Required, |entity: TestEntity| harness.dao.save(&entity));

    harness
        .tx
        .required(|| -> CoreResult<()> {
            save_one(e(1))?;
            save_one(e(2))
        })
        .unwrap();
    save_one(e(3)).unwrap();

    assert_eq!(
        harness.transact_keys(),
        vec![keys(&["key1", "key2"]), keys(&["key3"])]
    );
}
