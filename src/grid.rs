//! Hyperparameter grid definition.
//!
//! A [`HyperParameterGrid`] maps parameter names to ordered, non-empty lists
//! of candidate [`Value`]s. The grid is immutable once built and cheap to
//! clone, so one definition can back any number of concurrent searches.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::permutation::Permutation;
use crate::value::Value;

#[derive(Debug)]
struct GridInner {
    names: Arc<[String]>,
    values: Vec<Vec<Value>>,
    size: u64,
}

/// An immutable Cartesian search space.
///
/// Parameters keep their insertion order. That order fixes the enumeration
/// order of the space: combination index `i` is decoded as a mixed-radix
/// number whose least significant digit belongs to the last parameter, so
/// the last parameter varies fastest, exactly like nested `for` loops.
///
/// # Examples
///
/// ```
/// use hyperspace::HyperParameterGrid;
///
/// let grid = HyperParameterGrid::builder()
///     .param("_blending", [true, false])
///     .param("_k", [1.0, 2.0, 3.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(grid.size(), 6);
/// let first = grid.permutation(0).unwrap();
/// assert_eq!(first.get("_k").and_then(|v| v.as_float()), Some(1.0));
/// ```
#[derive(Clone, Debug)]
pub struct HyperParameterGrid {
    inner: Arc<GridInner>,
}

impl HyperParameterGrid {
    /// Creates a builder for a grid.
    #[must_use]
    pub fn builder() -> GridBuilder {
        GridBuilder::new()
    }

    /// Builds a grid from `(name, values)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if there are no parameters, a name is
    /// repeated, a value list is empty, or the number of combinations does
    /// not fit in a `u64`.
    pub fn new<I, S>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut values: Vec<Vec<Value>> = Vec::new();

        for (name, candidates) in params {
            let name = name.into();
            if names.contains(&name) {
                return Err(Error::invalid_grid(name, "parameter is defined twice"));
            }
            if candidates.is_empty() {
                return Err(Error::invalid_grid(name, "value list is empty"));
            }
            names.push(name);
            values.push(candidates);
        }

        if names.is_empty() {
            return Err(Error::invalid_grid("", "grid has no parameters"));
        }

        let mut size: u64 = 1;
        for (name, candidates) in names.iter().zip(&values) {
            size = u64::try_from(candidates.len())
                .ok()
                .and_then(|n| size.checked_mul(n))
                .ok_or_else(|| {
                    Error::invalid_grid(name.clone(), "number of combinations overflows u64")
                })?;
        }

        Ok(Self {
            inner: Arc::new(GridInner {
                names: names.into(),
                values,
                size,
            }),
        })
    }

    /// Builds a grid from an unordered map.
    ///
    /// Parameter names are sorted so the enumeration order is deterministic
    /// regardless of the map's iteration order.
    ///
    /// # Errors
    ///
    /// Same as [`HyperParameterGrid::new`].
    pub fn from_map(map: HashMap<String, Vec<Value>>) -> Result<Self> {
        let mut entries: Vec<(String, Vec<Value>)> = map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self::new(entries)
    }

    /// Total number of combinations, `∏ |values_i|`.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.inner.size
    }

    /// Number of parameters in the grid.
    #[must_use]
    pub fn n_params(&self) -> usize {
        self.inner.names.len()
    }

    /// Parameter names in enumeration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    /// Candidate values of a parameter.
    #[must_use]
    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.inner
            .names
            .iter()
            .position(|n| n == name)
            .map(|i| self.inner.values[i].as_slice())
    }

    /// Iterates `(name, values)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.inner
            .names
            .iter()
            .map(String::as_str)
            .zip(self.inner.values.iter().map(Vec::as_slice))
    }

    /// Decodes a combination index into its permutation.
    ///
    /// Returns `None` when `index >= self.size()`.
    #[must_use]
    pub fn permutation(&self, index: u64) -> Option<Permutation> {
        if index >= self.inner.size {
            return None;
        }

        let mut remainder = index;
        let mut bound: Vec<Value> = Vec::with_capacity(self.inner.values.len());
        for candidates in self.inner.values.iter().rev() {
            // Lengths were checked to fit in u64 at construction.
            let radix = candidates.len() as u64;
            #[allow(clippy::cast_possible_truncation)]
            let digit = (remainder % radix) as usize;
            remainder /= radix;
            bound.push(candidates[digit].clone());
        }
        bound.reverse();

        Some(Permutation::new(Arc::clone(&self.inner.names), bound, index))
    }
}

/// Builder for [`HyperParameterGrid`].
///
/// Validation is deferred to [`build`](GridBuilder::build) so parameters can
/// be chained freely.
#[derive(Debug, Default)]
pub struct GridBuilder {
    params: Vec<(String, Vec<Value>)>,
}

impl GridBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter with its candidate values.
    #[must_use]
    pub fn param<I, T>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.params
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Builds the grid.
    ///
    /// # Errors
    ///
    /// Same as [`HyperParameterGrid::new`].
    pub fn build(self) -> Result<HyperParameterGrid> {
        HyperParameterGrid::new(self.params)
    }
}
