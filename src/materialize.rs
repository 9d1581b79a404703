//! Binding permutations onto concrete parameter objects.

use crate::error::Result;
use crate::permutation::Permutation;

/// Turns an accepted [`Permutation`] into a concrete parameter object.
///
/// The walker never calls this itself. The training loop owns a template
/// (default parameters of some model) and uses a materializer to produce the
/// parameters for each accepted permutation, for example through
/// [`HyperSpaceIterator::next_materialized`](crate::HyperSpaceIterator::next_materialized).
///
/// Any `Fn(&P, &Permutation) -> Result<P>` is a materializer.
///
/// # Examples
///
/// ```
/// use hyperspace::{Error, HyperParameterGrid, ParameterMaterializer, Permutation};
///
/// #[derive(Clone, Debug, Default)]
/// struct TreeParams {
///     max_depth: i64,
/// }
///
/// let bind = |template: &TreeParams, p: &Permutation| -> Result<TreeParams, Error> {
///     let mut params = template.clone();
///     if let Some(v) = p.get("max_depth") {
///         params.max_depth = v.as_int().ok_or_else(|| Error::Materialization {
///             name: "max_depth".into(),
///             reason: format!("expected int, got {}", v.type_name()),
///         })?;
///     }
///     Ok(params)
/// };
///
/// let grid = HyperParameterGrid::builder().param("max_depth", [3, 5]).build()?;
/// let params = bind.materialize(&TreeParams::default(), &grid.permutation(1).unwrap())?;
/// assert_eq!(params.max_depth, 5);
/// # Ok::<(), Error>(())
/// ```
pub trait ParameterMaterializer<P> {
    /// Produces parameters from `template` with the permutation's values bound.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be bound, typically
    /// [`Error::Materialization`](crate::Error::Materialization).
    fn materialize(&self, template: &P, permutation: &Permutation) -> Result<P>;
}

impl<P, F> ParameterMaterializer<P> for F
where
    F: Fn(&P, &Permutation) -> Result<P>,
{
    fn materialize(&self, template: &P, permutation: &Permutation) -> Result<P> {
        self(template, permutation)
    }
}
