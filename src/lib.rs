#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Lazy, filterable walks over discrete hyperparameter grids.
//!
//! A [`HyperParameterGrid`] maps parameter names to finite lists of candidate
//! values. A [`HyperSpaceWalker`] binds a grid to [`SearchCriteria`] and a
//! chain of [`FilterFunction`]s, and hands out [`HyperSpaceIterator`]s that
//! produce one [`Permutation`] at a time, exhaustively or in random order,
//! until the space, the model budget or the time limit runs out.
//!
//! # Getting Started
//!
//! ```
//! use hyperspace::prelude::*;
//!
//! let grid = HyperParameterGrid::builder()
//!     .param("max_depth", [3, 5, 7])
//!     .param("learn_rate", [0.1, 0.01])
//!     .build()?;
//!
//! let criteria = SearchCriteria::builder()
//!     .strategy(SearchStrategy::RandomDiscrete)
//!     .max_models(3)
//!     .seed(42)
//!     .build()?;
//!
//! let walker = HyperSpaceWalker::builder(grid).criteria(criteria).build()?;
//! let mut it = walker.iterator();
//!
//! let mut trained = 0;
//! while it.has_next(None) {
//!     if let Draw::Accepted(params) = it.next(None)? {
//!         println!("training with {params}");
//!         trained += 1;
//!     }
//! }
//! assert_eq!(trained, 3);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`HyperParameterGrid`] | Ordered parameter names with their candidate values. |
//! | [`Permutation`] | One value per parameter, identified by its grid index. |
//! | [`FilterFunction`] | Rejects permutations, either always or after a first match. |
//! | [`SearchCriteria`] | Strategy, model budget, seed and runtime limit. |
//! | [`HyperSpaceWalker`] | Validated search request that creates iterators. |
//! | [`HyperSpaceIterator`] | Stateful cursor with `has_next` / `next` / `notify_failed` / `reset`. |
//! | [`StoppingRule`] | Ends the search early from a caller-supplied context. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on values, criteria and [`Direction`] | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at iterator lifecycle points | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod criteria;
mod error;
mod filter;
mod generator;
mod grid;
mod iterator;
mod materialize;
mod permutation;
mod stopping;
mod types;
mod value;
mod walker;

pub use criteria::{
    ReseedPolicy, SamplingMemory, SearchCriteria, SearchCriteriaBuilder, SearchStrategy,
};
pub use error::{Error, Result};
pub use filter::{FilterChain, FilterFunction, Predicate};
pub use grid::{GridBuilder, HyperParameterGrid};
pub use iterator::{Accepted, Draw, HyperSpaceIterator};
pub use materialize::ParameterMaterializer;
pub use permutation::Permutation;
pub use stopping::{NoImprovementStop, StoppingRule};
pub use types::{Direction, IteratorState, StopReason};
pub use value::Value;
pub use walker::{HyperSpaceWalker, HyperSpaceWalkerBuilder};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use hyperspace::prelude::*;
/// ```
pub mod prelude {
    pub use crate::criteria::{SearchCriteria, SearchStrategy};
    pub use crate::error::{Error, Result};
    pub use crate::filter::FilterFunction;
    pub use crate::grid::HyperParameterGrid;
    pub use crate::iterator::{Draw, HyperSpaceIterator};
    pub use crate::materialize::ParameterMaterializer;
    pub use crate::permutation::Permutation;
    pub use crate::stopping::{NoImprovementStop, StoppingRule};
    pub use crate::types::Direction;
    pub use crate::value::Value;
    pub use crate::walker::HyperSpaceWalker;
}
