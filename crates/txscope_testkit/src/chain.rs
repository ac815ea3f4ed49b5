//! Nested call chains for propagation tests.
//!
//! A chain is a list of frames. Frame `i` runs under its own propagation
//! mode, records its steps, then calls frame `i + 1` before returning.

use crate::fixtures::{TestEntity, TestHarness};
use std::cell::Cell;
use txscope_core::{CoreResult, Propagation};

/// A write recorded by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Save a new entity.
    Save,
    /// Delete an entity.
    Delete,
}

/// One transactional call in a chain.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Propagation mode of the call.
    pub propagation: Propagation,
    /// Writes recorded before calling the next frame.
    pub steps: Vec<Step>,
}

/// Key of the `n`-th write of a chain.
pub fn chain_key(n: usize) -> String {
    format!("k{n:04}")
}

/// Runs `frames` as nested transactional calls through `harness`.
///
/// Frames that record nothing only succeed when the harness allows empty
/// transactions.
pub fn run_chain(harness: &TestHarness, frames: &[Frame]) -> CoreResult<()> {
    let counter = Cell::new(0);
    run_frame(harness, frames, &counter)
}

fn run_frame(harness: &TestHarness, frames: &[Frame], counter: &Cell<usize>) -> CoreResult<()> {
    let Some((frame, rest)) = frames.split_first() else {
        return Ok(());
    };

    harness.tx.run(frame.propagation, || {
        for step in &frame.steps {
            let entity = TestEntity::new(chain_key(counter.get()), "value");
            counter.set(counter.get() + 1);
            match step {
                Step::Save => harness.dao.save(&entity)?,
                Step::Delete => harness.dao.delete(&entity)?,
            }
        }
        run_frame(harness, rest, counter)
    })
}

/// Returns the keys of each atomic write a successful chain produces, in
/// commit order.
///
/// Frames joining a manager add to its batch; each `RequiresNew` frame
/// opens a new one. Managers commit innermost first, and managers that
/// recorded nothing never reach the store.
pub fn expected_batches(frames: &[Frame]) -> Vec<Vec<String>> {
    let mut managers: Vec<Vec<String>> = Vec::new();
    let mut n = 0;

    for frame in frames {
        if managers.is_empty() || frame.propagation == Propagation::RequiresNew {
            managers.push(Vec::new());
        }
        if let Some(current) = managers.last_mut() {
            for _ in &frame.steps {
                current.push(chain_key(n));
                n += 1;
            }
        }
    }

    managers
        .into_iter()
        .rev()
        .filter(|batch| !batch.is_empty())
        .collect()
}
