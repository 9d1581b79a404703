//! Caller-context stopping rules.
//!
//! A [`StoppingRule`] looks at the opaque context the caller passes to
//! [`HyperSpaceIterator::has_next`](crate::HyperSpaceIterator::has_next) and
//! decides whether the search should end early. Rules are pure functions of
//! the context, so calling `has_next` repeatedly with the same context gives
//! the same answer.

use crate::types::Direction;

/// Decides from the caller's context whether to stop the search.
pub trait StoppingRule<C: ?Sized>: Send + Sync {
    /// Returns `true` to stop the search.
    fn should_stop(&self, context: &C) -> bool;
}

impl<C: ?Sized, F> StoppingRule<C> for F
where
    F: Fn(&C) -> bool + Send + Sync,
{
    fn should_stop(&self, context: &C) -> bool {
        self(context)
    }
}

/// Stops when recent models no longer improve on earlier ones.
///
/// The context is the history of model scores in training order. The rule
/// compares the best score among the last `stopping_rounds` entries with the
/// best score before them and stops if the relative improvement does not
/// exceed `tolerance`. Histories shorter than `2 * stopping_rounds` never
/// stop the search, and `stopping_rounds == 0` disables the rule.
///
/// # Examples
///
/// ```
/// use hyperspace::{Direction, NoImprovementStop, StoppingRule};
///
/// let rule = NoImprovementStop::new(2, Direction::Maximize).tolerance(0.01);
/// assert!(!rule.should_stop(&[0.70, 0.75, 0.80, 0.85][..]));
/// assert!(rule.should_stop(&[0.70, 0.85, 0.80, 0.851][..]));
/// ```
#[derive(Clone, Debug)]
pub struct NoImprovementStop {
    stopping_rounds: usize,
    tolerance: f64,
    direction: Direction,
}

impl NoImprovementStop {
    /// Creates a rule over the last `stopping_rounds` scores with zero tolerance.
    #[must_use]
    pub fn new(stopping_rounds: usize, direction: Direction) -> Self {
        Self {
            stopping_rounds,
            tolerance: 0.0,
            direction,
        }
    }

    /// Sets the relative improvement required to keep searching.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn best(&self, scores: &[f64]) -> Option<f64> {
        let finite = scores.iter().copied().filter(|s| s.is_finite());
        match self.direction {
            Direction::Minimize => finite.reduce(f64::min),
            Direction::Maximize => finite.reduce(f64::max),
        }
    }
}

impl StoppingRule<[f64]> for NoImprovementStop {
    fn should_stop(&self, scores: &[f64]) -> bool {
        let rounds = self.stopping_rounds;
        if rounds == 0 || scores.len() < 2 * rounds {
            return false;
        }

        let (earlier, recent) = scores.split_at(scores.len() - rounds);
        let (Some(reference), Some(latest)) = (self.best(earlier), self.best(recent)) else {
            return false;
        };

        let margin = self.tolerance * reference.abs();
        match self.direction {
            Direction::Minimize => latest >= reference - margin,
            Direction::Maximize => latest <= reference + margin,
        }
    }
}
