//! Permutation filters.
//!
//! A [`FilterChain`] decides whether a generated [`Permutation`] is worth
//! training. Each [`FilterFunction`] returns `true` to keep a permutation.
//! Stateless filters are pure predicates; first-match suppression filters
//! keep the first permutation their predicate matches and reject every
//! later match until they are reset.

use core::fmt;
use std::sync::Arc;

use crate::permutation::Permutation;

/// A shareable permutation predicate.
pub type Predicate = Arc<dyn Fn(&Permutation) -> bool + Send + Sync>;

/// A single filter in a [`FilterChain`].
///
/// # Examples
///
/// ```
/// use hyperspace::FilterFunction;
///
/// // Keep only one model with blending disabled.
/// let blending_off = FilterFunction::first_match(|p| {
///     p.get("_blending").and_then(|v| v.as_bool()) == Some(false)
/// });
///
/// // Never try k == 3 together with f == 1.
/// let no_k3_f1 = FilterFunction::stateless(|p| {
///     !(p.get("_k").and_then(|v| v.as_float()) == Some(3.0)
///         && p.get("_f").and_then(|v| v.as_float()) == Some(1.0))
/// });
/// # let _ = (blending_off, no_k3_f1);
/// ```
#[derive(Clone)]
pub enum FilterFunction {
    /// Keeps permutations for which the predicate returns `true`.
    Stateless(Predicate),
    /// Keeps the first permutation matching the predicate and rejects every
    /// later match. Non-matching permutations always pass.
    FirstMatchSuppression {
        /// Match condition.
        predicate: Predicate,
        /// Whether a match has already been let through.
        has_matched: bool,
    },
}

impl FilterFunction {
    /// Creates a stateless filter. The predicate returns `true` to keep.
    #[must_use]
    pub fn stateless<F>(predicate: F) -> Self
    where
        F: Fn(&Permutation) -> bool + Send + Sync + 'static,
    {
        FilterFunction::Stateless(Arc::new(predicate))
    }

    /// Creates a first-match suppression filter. The predicate returns
    /// `true` when a permutation belongs to the suppressed group.
    #[must_use]
    pub fn first_match<F>(predicate: F) -> Self
    where
        F: Fn(&Permutation) -> bool + Send + Sync + 'static,
    {
        FilterFunction::FirstMatchSuppression {
            predicate: Arc::new(predicate),
            has_matched: false,
        }
    }

    /// Returns `true` if the permutation passes this filter.
    ///
    /// A first-match filter used on its own takes its slot here. Inside a
    /// [`FilterChain`] the slot is only taken once the whole chain accepts.
    pub fn apply(&mut self, permutation: &Permutation) -> bool {
        if !self.keeps(permutation) {
            return false;
        }
        self.commit(permutation);
        true
    }

    /// The keep decision, without touching suppression state.
    fn keeps(&self, permutation: &Permutation) -> bool {
        match self {
            FilterFunction::Stateless(predicate) => predicate(permutation),
            FilterFunction::FirstMatchSuppression {
                predicate,
                has_matched,
            } => !*has_matched || !predicate(permutation),
        }
    }

    /// Records an accepted permutation that matches a first-match predicate.
    fn commit(&mut self, permutation: &Permutation) {
        if let FilterFunction::FirstMatchSuppression {
            predicate,
            has_matched,
        } = self
        {
            *has_matched = *has_matched || predicate(permutation);
        }
    }

    /// Clears suppression state. No-op for stateless filters.
    pub fn reset(&mut self) {
        if let FilterFunction::FirstMatchSuppression { has_matched, .. } = self {
            *has_matched = false;
        }
    }

    /// Whether a first-match filter has already let a match through.
    #[must_use]
    pub fn has_matched(&self) -> bool {
        matches!(
            self,
            FilterFunction::FirstMatchSuppression {
                has_matched: true,
                ..
            }
        )
    }

    fn fresh_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }
}

impl fmt::Debug for FilterFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterFunction::Stateless(_) => f.write_str("Stateless"),
            FilterFunction::FirstMatchSuppression { has_matched, .. } => f
                .debug_struct("FirstMatchSuppression")
                .field("has_matched", has_matched)
                .finish_non_exhaustive(),
        }
    }
}

/// An ordered list of filters combined with logical AND.
#[derive(Clone, Debug, Default)]
pub struct FilterChain {
    filters: Vec<FilterFunction>,
}

impl FilterChain {
    /// Creates an empty chain, which accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter.
    pub fn push(&mut self, filter: FilterFunction) {
        self.filters.push(filter);
    }

    /// Number of filters in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if the chain has no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The filters, in evaluation order.
    #[must_use]
    pub fn filters(&self) -> &[FilterFunction] {
        &self.filters
    }

    /// Returns `true` if every filter keeps the permutation.
    ///
    /// Filters are evaluated left to right and evaluation stops at the first
    /// rejection. Suppression state changes only for accepted permutations,
    /// so a first-match slot is never spent on a permutation that a later
    /// filter rejects.
    pub fn apply_all(&mut self, permutation: &Permutation) -> bool {
        if !self.filters.iter().all(|f| f.keeps(permutation)) {
            return false;
        }
        for filter in &mut self.filters {
            filter.commit(permutation);
        }
        true
    }

    /// Clears the suppression state of every filter.
    pub fn reset_all(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }

    /// A chain sharing the same predicates with all suppression state cleared.
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        Self {
            filters: self.filters.iter().map(FilterFunction::fresh_copy).collect(),
        }
    }
}

impl FromIterator<FilterFunction> for FilterChain {
    fn from_iter<I: IntoIterator<Item = FilterFunction>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

impl Extend<FilterFunction> for FilterChain {
    fn extend<I: IntoIterator<Item = FilterFunction>>(&mut self, iter: I) {
        self.filters.extend(iter);
    }
}
