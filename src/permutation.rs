//! A single binding of one value per grid parameter.

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use crate::value::Value;

/// One concrete point of a [`HyperParameterGrid`](crate::HyperParameterGrid).
///
/// Values are stored in grid order and share the grid's name table. Two
/// permutations are equal when they bind the same names to the same values;
/// the combination index is informational and takes no part in equality.
#[derive(Clone, Debug)]
pub struct Permutation {
    names: Arc<[String]>,
    values: Vec<Value>,
    index: u64,
}

impl Permutation {
    pub(crate) fn new(names: Arc<[String]>, values: Vec<Value>, index: u64) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self {
            names,
            values,
            index,
        }
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
    }

    /// Position of this permutation in the grid's Cartesian ordering.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` for permutations decoded from a valid grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(name, value)` pairs in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(&self.values)
    }

    /// Copies the bindings into an owned map.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.iter()
            .map(|(name, value)| (name.to_owned(), value.clone()))
            .collect()
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.values == other.values
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}
