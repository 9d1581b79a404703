//! Search criteria: strategy, model budget, seed and runtime limit.

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the permutation space is traversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchStrategy {
    /// Every combination, in nested-loop order.
    #[default]
    Cartesian,
    /// Combinations drawn uniformly at random without replacement.
    RandomDiscrete,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Cartesian => f.write_str("Cartesian"),
            SearchStrategy::RandomDiscrete => f.write_str("RandomDiscrete"),
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = Error;

    /// Parses a strategy name, ignoring case, `-` and `_`.
    ///
    /// `exhaustive` and `random` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "cartesian" | "exhaustive" => Ok(SearchStrategy::Cartesian),
            "randomdiscrete" | "random" => Ok(SearchStrategy::RandomDiscrete),
            _ => Err(Error::InvalidCriteria(format!("invalid strategy '{s}'"))),
        }
    }
}

/// What [`reset`](crate::HyperSpaceIterator::reset) does to the random stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReseedPolicy {
    /// Re-seed with the original seed, so every pass replays the same order.
    #[default]
    Replay,
    /// Keep the current stream, so each pass visits the space in a new order.
    Continue,
}

/// How random-discrete search remembers which combinations it has drawn.
///
/// | Policy | Memory | Per-draw cost | Order |
/// |--------|--------|---------------|-------|
/// | `VisitedSet` | grows with draws | cheap while sparse, probes near the end | independent uniform draws |
/// | `Bijection` | constant | a few hash rounds | keyed pseudo-random permutation |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SamplingMemory {
    /// Track drawn indices in a set. After `max_retries` consecutive
    /// collisions the next unvisited index is found by a linear probe.
    VisitedSet {
        /// Random draws attempted before falling back to a probe.
        max_retries: u32,
    },
    /// Walk a seeded Feistel permutation of the index space.
    Bijection,
}

impl Default for SamplingMemory {
    fn default() -> Self {
        SamplingMemory::VisitedSet { max_retries: 64 }
    }
}

/// Parameters of one search request.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hyperspace::{SearchCriteria, SearchStrategy};
///
/// let criteria = SearchCriteria::builder()
///     .strategy(SearchStrategy::RandomDiscrete)
///     .max_models(10)
///     .seed(42)
///     .max_runtime(Duration::from_secs(3600))
///     .build()
///     .unwrap();
///
/// assert_eq!(criteria.max_models(), Some(10));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SearchCriteria {
    strategy: SearchStrategy,
    max_models: Option<u64>,
    seed: Option<u64>,
    max_runtime: Option<Duration>,
    reseed_policy: ReseedPolicy,
    sampling_memory: SamplingMemory,
}

impl SearchCriteria {
    /// Creates a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> SearchCriteriaBuilder {
        SearchCriteriaBuilder::default()
    }

    /// Exhaustive search with no budget.
    #[must_use]
    pub fn cartesian() -> Self {
        Self::default()
    }

    /// Random-discrete search with no budget and a fresh seed.
    #[must_use]
    pub fn random_discrete() -> Self {
        Self {
            strategy: SearchStrategy::RandomDiscrete,
            ..Self::default()
        }
    }

    /// Checks the criteria for values the walker cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCriteria`] if `max_models` is zero, `max_runtime`
    /// is zero, or a visited-set policy allows zero retries.
    pub fn validate(&self) -> Result<()> {
        if self.max_models == Some(0) {
            return Err(Error::InvalidCriteria(
                "max_models must be positive".to_owned(),
            ));
        }
        if self.max_runtime.is_some_and(|d| d.is_zero()) {
            return Err(Error::InvalidCriteria(
                "max_runtime must be positive".to_owned(),
            ));
        }
        if self.sampling_memory == (SamplingMemory::VisitedSet { max_retries: 0 }) {
            return Err(Error::InvalidCriteria(
                "visited-set sampling needs at least one retry".to_owned(),
            ));
        }
        Ok(())
    }

    /// The traversal strategy.
    #[must_use]
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Maximum number of non-failed accepted permutations.
    #[must_use]
    pub fn max_models(&self) -> Option<u64> {
        self.max_models
    }

    /// Seed for random-discrete search.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Wall-clock limit measured from iterator creation.
    #[must_use]
    pub fn max_runtime(&self) -> Option<Duration> {
        self.max_runtime
    }

    /// Random stream behaviour on reset.
    #[must_use]
    pub fn reseed_policy(&self) -> ReseedPolicy {
        self.reseed_policy
    }

    /// Visited-combination bookkeeping for random search.
    #[must_use]
    pub fn sampling_memory(&self) -> SamplingMemory {
        self.sampling_memory
    }
}

/// Builder for [`SearchCriteria`].
#[derive(Clone, Debug, Default)]
pub struct SearchCriteriaBuilder {
    criteria: SearchCriteria,
}

impl SearchCriteriaBuilder {
    /// Sets the traversal strategy. Defaults to [`SearchStrategy::Cartesian`].
    #[must_use]
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.criteria.strategy = strategy;
        self
    }

    /// Caps the number of non-failed accepted permutations.
    #[must_use]
    pub fn max_models(mut self, max_models: u64) -> Self {
        self.criteria.max_models = Some(max_models);
        self
    }

    /// Fixes the random seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.criteria.seed = Some(seed);
        self
    }

    /// Stops the search once this much wall-clock time has passed.
    #[must_use]
    pub fn max_runtime(mut self, max_runtime: Duration) -> Self {
        self.criteria.max_runtime = Some(max_runtime);
        self
    }

    /// Sets the reset behaviour of the random stream. Defaults to
    /// [`ReseedPolicy::Replay`].
    #[must_use]
    pub fn reseed_policy(mut self, policy: ReseedPolicy) -> Self {
        self.criteria.reseed_policy = policy;
        self
    }

    /// Sets the visited-combination policy for random search.
    #[must_use]
    pub fn sampling_memory(mut self, memory: SamplingMemory) -> Self {
        self.criteria.sampling_memory = memory;
        self
    }

    /// Validates and returns the criteria.
    ///
    /// # Errors
    ///
    /// See [`SearchCriteria::validate`].
    pub fn build(self) -> Result<SearchCriteria> {
        self.criteria.validate()?;
        Ok(self.criteria)
    }
}
