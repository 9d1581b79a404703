//! The stateful cursor over a hyperparameter space.

use core::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::filter::FilterChain;
use crate::generator::PermutationGenerator;
use crate::grid::HyperParameterGrid;
use crate::materialize::ParameterMaterializer;
use crate::permutation::Permutation;
use crate::stopping::StoppingRule;
use crate::types::{IteratorState, StopReason};

/// Outcome of one [`HyperSpaceIterator::next`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    /// The permutation passed every filter and counts as a model attempt.
    Accepted(Permutation),
    /// The drawn permutation was filtered out. No budget was consumed.
    Rejected,
}

impl Draw {
    /// Returns `true` for [`Draw::Accepted`].
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Draw::Accepted(_))
    }

    /// Borrows the accepted permutation.
    #[must_use]
    pub fn accepted(&self) -> Option<&Permutation> {
        match self {
            Draw::Accepted(p) => Some(p),
            Draw::Rejected => None,
        }
    }

    /// Consumes the draw, returning the accepted permutation.
    #[must_use]
    pub fn into_accepted(self) -> Option<Permutation> {
        match self {
            Draw::Accepted(p) => Some(p),
            Draw::Rejected => None,
        }
    }
}

/// A lazy, resettable walk over a [`HyperParameterGrid`].
///
/// Created by [`HyperSpaceWalker::iterator`](crate::HyperSpaceWalker::iterator).
/// The caller drives it with the loop
///
/// 1. [`has_next`](Self::has_next) to ask whether more work exists,
/// 2. [`next`](Self::next) to draw a permutation, which may be
///    [`Draw::Rejected`] by the filter chain,
/// 3. [`notify_failed`](Self::notify_failed) if training on the accepted
///    permutation did not produce a usable model.
///
/// # Budget
///
/// With `max_models = K`, the iterator keeps going while
/// `accepted - failed < K`. Rejected draws never count, and every reported
/// failure buys exactly one extra accepted permutation.
///
/// # Context
///
/// Every operation takes an optional caller context `C`, typically the
/// outcome of earlier models. The iterator does not interpret it; it is
/// handed to the walker's [`StoppingRule`], if any.
///
/// # Examples
///
/// ```
/// use hyperspace::{Draw, FilterFunction, HyperParameterGrid, HyperSpaceWalker, SearchCriteria};
///
/// let grid = HyperParameterGrid::builder()
///     .param("depth", [3, 5, 7])
///     .param("lr", [0.1, 0.01])
///     .build()?;
/// let criteria = SearchCriteria::builder().max_models(4).build()?;
/// let skip_depth_5 =
///     FilterFunction::stateless(|p| p.get("depth").and_then(|v| v.as_int()) != Some(5));
/// let walker = HyperSpaceWalker::builder(grid)
///     .criteria(criteria)
///     .filter(skip_depth_5)
///     .build()?;
///
/// let mut it = walker.iterator();
/// let mut trained = Vec::new();
/// while it.has_next(None) {
///     if let Draw::Accepted(p) = it.next(None)? {
///         trained.push(p);
///     }
/// }
/// assert_eq!(trained.len(), 4);
/// # Ok::<(), hyperspace::Error>(())
/// ```
pub struct HyperSpaceIterator<C: ?Sized = ()> {
    grid: HyperParameterGrid,
    generator: PermutationGenerator,
    filters: FilterChain,
    max_models: Option<u64>,
    deadline: Option<Instant>,
    stopping_rule: Option<Arc<dyn StoppingRule<C>>>,
    accepted_count: u64,
    failed_count: u64,
    /// An accepted permutation exists that has not been reported failed.
    unreported: bool,
    state: IteratorState,
}

impl<C: ?Sized> HyperSpaceIterator<C> {
    pub(crate) fn new(
        grid: HyperParameterGrid,
        generator: PermutationGenerator,
        filters: FilterChain,
        max_models: Option<u64>,
        deadline: Option<Instant>,
        stopping_rule: Option<Arc<dyn StoppingRule<C>>>,
    ) -> Self {
        Self {
            grid,
            generator,
            filters,
            max_models,
            deadline,
            stopping_rule,
            accepted_count: 0,
            failed_count: 0,
            unreported: false,
            state: IteratorState::Ready,
        }
    }

    /// Returns `true` if [`next`](Self::next) may be called.
    ///
    /// Transitions to [`IteratorState::Exhausted`] once the pass has no
    /// undrawn combinations, the budget is used up, the deadline has passed,
    /// or the stopping rule fires for `context`.
    pub fn has_next(&mut self, context: Option<&C>) -> bool {
        if matches!(self.state, IteratorState::Exhausted(_)) {
            return false;
        }
        match self.stop_reason(context) {
            Some(reason) => {
                self.exhaust(reason);
                false
            }
            None => true,
        }
    }

    /// Draws the next combination and runs it through the filter chain.
    ///
    /// Each successful call consumes exactly one combination of the current
    /// pass, whether it is accepted or rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if [`has_next`](Self::has_next) would
    /// return `false`.
    pub fn next(&mut self, context: Option<&C>) -> Result<Draw> {
        if !self.has_next(context) {
            return Err(Error::IllegalState(
                "next() called on an exhausted iterator",
            ));
        }

        let permutation = self
            .generator
            .next_index()
            .and_then(|index| self.grid.permutation(index))
            .ok_or(Error::IllegalState("generator produced no combination"))?;

        if !self.filters.apply_all(&permutation) {
            trace_debug!(index = permutation.index(), "permutation rejected by filters");
            return Ok(Draw::Rejected);
        }

        self.accepted_count += 1;
        self.unreported = true;
        trace_debug!(
            index = permutation.index(),
            accepted = self.accepted_count,
            "permutation accepted"
        );
        Ok(Draw::Accepted(permutation))
    }

    /// Records that the most recently accepted permutation did not yield a
    /// usable model.
    ///
    /// This only adjusts budget accounting; the permutation is not replayed.
    /// Report a failure before the next [`has_next`](Self::has_next) call:
    /// once `has_next` has seen the budget used up, the iterator is closed
    /// for good and late reports are refused.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if no permutation has been accepted
    /// since the last reported failure, or if the iterator is already
    /// exhausted by its budget.
    pub fn notify_failed(&mut self, _context: Option<&C>) -> Result<()> {
        if self.state == IteratorState::Exhausted(StopReason::BudgetReached) {
            return Err(Error::IllegalState(
                "notify_failed() after the model budget closed the iterator",
            ));
        }
        if !self.unreported {
            return Err(Error::IllegalState(
                "notify_failed() without an outstanding accepted permutation",
            ));
        }
        self.unreported = false;
        self.failed_count += 1;
        trace_info!(
            failed = self.failed_count,
            accepted = self.accepted_count,
            "model failure reported"
        );
        Ok(())
    }

    /// Starts a new pass over the space and clears all suppression state.
    ///
    /// Accepted and failed counts are kept, so `max_models` bounds the whole
    /// search rather than a single pass. An iterator that stopped only because
    /// the previous pass ran out of combinations becomes ready again; budget,
    /// deadline and stopping-rule exhaustion are final.
    pub fn reset(&mut self) {
        self.generator.reset();
        self.filters.reset_all();
        if self.state == IteratorState::Exhausted(StopReason::SpaceExhausted) {
            self.state = IteratorState::Ready;
        }
        trace_info!(accepted = self.accepted_count, "iterator reset");
    }

    /// Draws until a permutation is accepted.
    ///
    /// Returns `Ok(None)` if the iterator is exhausted first.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`next`](Self::next).
    pub fn next_accepted(&mut self, context: Option<&C>) -> Result<Option<Permutation>> {
        while self.has_next(context) {
            if let Draw::Accepted(p) = self.next(context)? {
                return Ok(Some(p));
            }
        }
        Ok(None)
    }

    /// Draws one combination and materializes it onto `template` if accepted.
    ///
    /// Returns `Ok(None)` for a rejected draw. A materialization error leaves
    /// the permutation counted as accepted; report it with
    /// [`notify_failed`](Self::notify_failed) to recover the budget.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`next`](Self::next) and from `materializer`.
    pub fn next_materialized<P, M>(
        &mut self,
        context: Option<&C>,
        template: &P,
        materializer: &M,
    ) -> Result<Option<P>>
    where
        M: ParameterMaterializer<P> + ?Sized,
    {
        match self.next(context)? {
            Draw::Accepted(p) => materializer.materialize(template, &p).map(Some),
            Draw::Rejected => Ok(None),
        }
    }

    /// Iterates accepted permutations without a context, skipping rejections.
    pub fn accepted(&mut self) -> Accepted<'_, C> {
        Accepted { inner: self }
    }

    /// Permutations accepted so far, across all passes.
    #[must_use]
    pub fn accepted_count(&self) -> u64 {
        self.accepted_count
    }

    /// Failures reported so far, across all passes.
    #[must_use]
    pub fn failed_count(&self) -> u64 {
        self.failed_count
    }

    /// Combinations drawn in the current pass.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.generator.drawn()
    }

    /// Total number of combinations in the grid.
    #[must_use]
    pub fn max_hyper_space_size(&self) -> u64 {
        self.grid.size()
    }

    /// Accepted permutations still allowed by the budget, if one is set.
    #[must_use]
    pub fn remaining_budget(&self) -> Option<u64> {
        self.max_models
            .map(|max| max.saturating_sub(self.successful_count()))
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// The grid being walked.
    #[must_use]
    pub fn grid(&self) -> &HyperParameterGrid {
        &self.grid
    }

    /// This iterator's filter chain, including its suppression state.
    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    fn successful_count(&self) -> u64 {
        self.accepted_count.saturating_sub(self.failed_count)
    }

    fn stop_reason(&self, context: Option<&C>) -> Option<StopReason> {
        if self
            .max_models
            .is_some_and(|max| self.successful_count() >= max)
        {
            return Some(StopReason::BudgetReached);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(StopReason::DeadlineReached);
        }
        if self
            .stopping_rule
            .as_ref()
            .zip(context)
            .is_some_and(|(rule, ctx)| rule.should_stop(ctx))
        {
            return Some(StopReason::StoppingRule);
        }
        if !self.generator.has_remaining() {
            return Some(StopReason::SpaceExhausted);
        }
        None
    }

    fn exhaust(&mut self, reason: StopReason) {
        self.state = IteratorState::Exhausted(reason);
        trace_info!(
            reason = %reason,
            accepted = self.accepted_count,
            failed = self.failed_count,
            "hyperspace iterator exhausted"
        );
    }
}

impl<C: ?Sized> fmt::Debug for HyperSpaceIterator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperSpaceIterator")
            .field("size", &self.grid.size())
            .field("draws", &self.generator.drawn())
            .field("accepted_count", &self.accepted_count)
            .field("failed_count", &self.failed_count)
            .field("max_models", &self.max_models)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Iterator over accepted permutations, created by
/// [`HyperSpaceIterator::accepted`].
pub struct Accepted<'a, C: ?Sized = ()> {
    inner: &'a mut HyperSpaceIterator<C>,
}

impl<C: ?Sized> Iterator for Accepted<'_, C> {
    type Item = Permutation;

    fn next(&mut self) -> Option<Permutation> {
        // `next_accepted` only draws after `has_next`, so it cannot fail.
        let drawn = self.inner.next_accepted(None);
        debug_assert!(drawn.is_ok(), "accepted() draw failed: {drawn:?}");
        drawn.ok().flatten()
    }
}
