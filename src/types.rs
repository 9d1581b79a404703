//! Core types shared across the crate.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction in which a score improves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Lower scores are better.
    Minimize,
    /// Higher scores are better.
    Maximize,
}

/// Why an iterator stopped producing permutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Every combination of the current pass has been drawn.
    SpaceExhausted,
    /// `accepted - failed` reached `max_models`.
    BudgetReached,
    /// The `max_runtime` deadline passed.
    DeadlineReached,
    /// The configured stopping rule asked to stop.
    StoppingRule,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::SpaceExhausted => "space exhausted",
            StopReason::BudgetReached => "model budget reached",
            StopReason::DeadlineReached => "deadline reached",
            StopReason::StoppingRule => "stopping rule triggered",
        };
        f.write_str(s)
    }
}

/// The lifecycle state of a [`HyperSpaceIterator`](crate::HyperSpaceIterator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IteratorState {
    /// More permutations may exist.
    Ready,
    /// No further permutations will be produced.
    Exhausted(StopReason),
}
