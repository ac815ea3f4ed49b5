//! Property-based test generators using proptest.
//!
//! Provides strategies for write steps and nested call chains. Keys are
//! assigned when a chain runs, so generated input never repeats an item
//! inside one atomic write.

use crate::chain::{Frame, Step};
use proptest::prelude::*;
use txscope_core::Propagation;

/// Strategy for a propagation mode.
pub fn propagation_strategy() -> impl Strategy<Value = Propagation> {
    prop_oneof![Just(Propagation::Required), Just(Propagation::RequiresNew)]
}

/// Strategy for a single write step.
pub fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![3 => Just(Step::Save), 1 => Just(Step::Delete)]
}

/// Strategy for up to `max` write steps.
pub fn steps_strategy(max: usize) -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(), 0..=max)
}

/// Strategy for one frame of a call chain.
pub fn frame_strategy(max_steps: usize) -> impl Strategy<Value = Frame> {
    (propagation_strategy(), steps_strategy(max_steps))
        .prop_map(|(propagation, steps)| Frame { propagation, steps })
}

/// Strategy for a chain of 1 to `max_frames` nested frames.
pub fn chain_strategy(max_frames: usize, max_steps: usize) -> impl Strategy<Value = Vec<Frame>> {
    prop::collection::vec(frame_strategy(max_steps), 1..=max_frames.max(1))
}
