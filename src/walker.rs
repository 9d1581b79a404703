//! Binding a grid, filters and criteria into iterators.

use core::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::criteria::SearchCriteria;
use crate::error::Result;
use crate::filter::{FilterChain, FilterFunction};
use crate::generator::PermutationGenerator;
use crate::grid::HyperParameterGrid;
use crate::iterator::HyperSpaceIterator;
use crate::stopping::StoppingRule;

/// A validated search request that hands out [`HyperSpaceIterator`]s.
///
/// The walker keeps the grid, the filter definitions and the criteria. Every
/// call to [`iterator`](Self::iterator) returns an independent cursor with
/// its own generator and its own copy of the suppression state, so several
/// searches over the same definition never interfere.
///
/// Random-discrete walkers resolve their seed once, at construction. All
/// iterators of one walker therefore draw the same order.
///
/// # Examples
///
/// ```
/// use hyperspace::{FilterFunction, HyperParameterGrid, HyperSpaceWalker, SearchCriteria};
///
/// let grid = HyperParameterGrid::builder()
///     .param("_blending", [true, false])
///     .param("_noise_level", [0.0, 0.01, 0.1])
///     .build()?;
///
/// let walker = HyperSpaceWalker::builder(grid)
///     .criteria(SearchCriteria::random_discrete())
///     .filter(FilterFunction::first_match(|p| {
///         p.get("_blending").and_then(|v| v.as_bool()) == Some(false)
///     }))
///     .build()?;
///
/// // Three blending=true rows plus a single blending=false row.
/// assert_eq!(walker.iterator().accepted().count(), 4);
/// # Ok::<(), hyperspace::Error>(())
/// ```
pub struct HyperSpaceWalker<C: ?Sized = ()> {
    grid: HyperParameterGrid,
    filters: FilterChain,
    criteria: SearchCriteria,
    seed: u64,
    stopping_rule: Option<Arc<dyn StoppingRule<C>>>,
}

impl HyperSpaceWalker {
    /// Starts building a walker over `grid` with default criteria and no
    /// filters.
    #[must_use]
    pub fn builder(grid: HyperParameterGrid) -> HyperSpaceWalkerBuilder {
        HyperSpaceWalkerBuilder {
            grid,
            criteria: SearchCriteria::default(),
            filters: FilterChain::new(),
            stopping_rule: None,
        }
    }

    /// Builds a walker without a stopping rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCriteria`](crate::Error::InvalidCriteria) if
    /// the criteria fail validation.
    pub fn new<I>(grid: HyperParameterGrid, criteria: SearchCriteria, filters: I) -> Result<Self>
    where
        I: IntoIterator<Item = FilterFunction>,
    {
        Self::builder(grid).criteria(criteria).filters(filters).build()
    }
}

impl<C: ?Sized> HyperSpaceWalker<C> {
    /// Creates a fresh iterator positioned before the first combination.
    ///
    /// A `max_runtime` in the criteria starts counting now.
    #[must_use]
    pub fn iterator(&self) -> HyperSpaceIterator<C> {
        let generator = PermutationGenerator::new(
            self.grid.size(),
            self.criteria.strategy(),
            self.seed,
            self.criteria.reseed_policy(),
            self.criteria.sampling_memory(),
        );
        let deadline = self
            .criteria
            .max_runtime()
            .and_then(|runtime| Instant::now().checked_add(runtime));

        trace_info!(
            strategy = %self.criteria.strategy(),
            size = self.grid.size(),
            max_models = ?self.criteria.max_models(),
            filters = self.filters.len(),
            "hyperspace iterator created"
        );

        HyperSpaceIterator::new(
            self.grid.clone(),
            generator,
            self.filters.fresh_copy(),
            self.criteria.max_models(),
            deadline,
            self.stopping_rule.clone(),
        )
    }

    /// The grid being searched.
    #[must_use]
    pub fn grid(&self) -> &HyperParameterGrid {
        &self.grid
    }

    /// The validated criteria.
    #[must_use]
    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Filter definitions. Their suppression state is always clear; each
    /// iterator works on its own copy.
    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    /// The seed used by random-discrete iterators.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Total number of combinations in the grid.
    #[must_use]
    pub fn max_hyper_space_size(&self) -> u64 {
        self.grid.size()
    }
}

impl<C: ?Sized> fmt::Debug for HyperSpaceWalker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperSpaceWalker")
            .field("grid", &self.grid)
            .field("filters", &self.filters)
            .field("criteria", &self.criteria)
            .field("seed", &self.seed)
            .field("has_stopping_rule", &self.stopping_rule.is_some())
            .finish()
    }
}

/// Builder for [`HyperSpaceWalker`], created by [`HyperSpaceWalker::builder`].
///
/// # Defaults
///
/// - Criteria: [`SearchCriteria::default`] (Cartesian, no budget)
/// - Filters: none
/// - Stopping rule: none, with context type `()`
pub struct HyperSpaceWalkerBuilder<C: ?Sized = ()> {
    grid: HyperParameterGrid,
    criteria: SearchCriteria,
    filters: FilterChain,
    stopping_rule: Option<Arc<dyn StoppingRule<C>>>,
}

impl<C: ?Sized> HyperSpaceWalkerBuilder<C> {
    /// Sets the search criteria.
    #[must_use]
    pub fn criteria(mut self, criteria: SearchCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Appends a filter to the chain.
    #[must_use]
    pub fn filter(mut self, filter: FilterFunction) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends several filters, in order.
    #[must_use]
    pub fn filters<I>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = FilterFunction>,
    {
        self.filters.extend(filters);
        self
    }

    /// Sets the stopping rule and fixes the context type it reads.
    ///
    /// Replaces any rule set before.
    #[must_use]
    pub fn stopping_rule<D, R>(self, rule: R) -> HyperSpaceWalkerBuilder<D>
    where
        D: ?Sized,
        R: StoppingRule<D> + 'static,
    {
        HyperSpaceWalkerBuilder {
            grid: self.grid,
            criteria: self.criteria,
            filters: self.filters,
            stopping_rule: Some(Arc::new(rule)),
        }
    }

    /// Validates the criteria and builds the walker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCriteria`](crate::Error::InvalidCriteria) if
    /// the criteria fail validation.
    pub fn build(self) -> Result<HyperSpaceWalker<C>> {
        self.criteria.validate()?;
        let seed = self.criteria.seed().unwrap_or_else(|| fastrand::u64(..));
        Ok(HyperSpaceWalker {
            grid: self.grid,
            filters: self.filters.fresh_copy(),
            criteria: self.criteria,
            seed,
            stopping_rule: self.stopping_rule,
        })
    }
}
