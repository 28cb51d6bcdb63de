//! Index values and index tuples.
//!
//! Every data instance of a component is addressed by an [`Index`]: one [`IndexValue`]
//! per dimension in the component's declared index sets.
//! A scalar component has a single data instance at the empty index.
//!
//! ```rust
//! use daeinit_core::index;
//! use daeinit_core::index::{Index, IndexValue};
//!
//! let idx = index![2.0, "a"];
//! assert_eq!(idx.len(), 2);
//! assert_eq!(idx.to_string(), "(2, a)");
//!
//! // Single dimension indices display bare
//! assert_eq!(index![2.0].to_string(), "2");
//! assert_eq!(Index::scalar().to_string(), "None");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single value within an index set.
///
/// Real values compare and hash by their bit pattern so that they can be used as keys.
/// `-0.0` is normalised to `0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IndexValue {
    Int(i64),
    Real(f64),
    Str(String),
}

impl IndexValue {
    fn normalised_bits(value: f64) -> u64 {
        if value == 0.0 {
            0.0f64.to_bits()
        } else {
            value.to_bits()
        }
    }

    /// The value as a float, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            IndexValue::Int(v) => Some(*v as f64),
            IndexValue::Real(v) => Some(*v),
            IndexValue::Str(_) => None,
        }
    }
}

impl PartialEq for IndexValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IndexValue::Int(a), IndexValue::Int(b)) => a == b,
            (IndexValue::Real(a), IndexValue::Real(b)) => {
                Self::normalised_bits(*a) == Self::normalised_bits(*b)
            }
            (IndexValue::Str(a), IndexValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for IndexValue {}

impl Hash for IndexValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            IndexValue::Int(v) => v.hash(state),
            IndexValue::Real(v) => Self::normalised_bits(*v).hash(state),
            IndexValue::Str(v) => v.hash(state),
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Int(v) => write!(f, "{}", v),
            IndexValue::Real(v) => write!(f, "{}", v),
            IndexValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        IndexValue::Int(value)
    }
}

impl From<i32> for IndexValue {
    fn from(value: i32) -> Self {
        IndexValue::Int(value as i64)
    }
}

impl From<f64> for IndexValue {
    fn from(value: f64) -> Self {
        IndexValue::Real(value)
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::Str(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::Str(value)
    }
}

/// A tuple of index values addressing a single data instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Index(Vec<IndexValue>);

impl Index {
    pub fn new(values: Vec<IndexValue>) -> Self {
        Self(values)
    }

    /// The index of a component with no index sets
    pub fn scalar() -> Self {
        Self(vec![])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[IndexValue] {
        &self.0
    }

    pub fn get(&self, position: usize) -> Option<&IndexValue> {
        self.0.get(position)
    }

    /// Return a new index with `value` inserted at `position`
    ///
    /// # Panics
    ///
    /// Panics if `position > self.len()`
    pub fn with_inserted(&self, position: usize, value: IndexValue) -> Self {
        let mut values = self.0.clone();
        values.insert(position, value);
        Self(values)
    }

    /// Return a new index with the value at `position` removed
    pub fn without(&self, position: usize) -> Self {
        let mut values = self.0.clone();
        values.remove(position);
        Self(values)
    }
}

impl From<IndexValue> for Index {
    fn from(value: IndexValue) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<IndexValue>> for Index {
    fn from(values: Vec<IndexValue>) -> Self {
        Self(values)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "None"),
            [single] => write!(f, "{}", single),
            values => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Build an [`Index`] from a list of values convertible to [`IndexValue`]
#[macro_export]
macro_rules! index {
    () => {
        $crate::index::Index::scalar()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::index::Index::new(vec![$($crate::index::IndexValue::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn real_zero_is_normalised() {
        let mut seen = HashSet::new();
        seen.insert(IndexValue::Real(0.0));
        assert!(seen.contains(&IndexValue::Real(-0.0)));
    }

    #[test]
    fn int_and_real_are_distinct() {
        assert_ne!(IndexValue::Int(1), IndexValue::Real(1.0));
    }

    #[test]
    fn insert_and_remove() {
        let idx = index!["a", "b"];
        let full = idx.with_inserted(1, IndexValue::from(3.0));
        assert_eq!(full, index!["a", 3.0, "b"]);
        assert_eq!(full.without(1), idx);
    }

    #[test]
    fn display() {
        assert_eq!(index![1, "x", 0.5].to_string(), "(1, x, 0.5)");
        assert_eq!(index!["x"].to_string(), "x");
    }
}
