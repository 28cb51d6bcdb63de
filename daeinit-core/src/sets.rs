//! Ordered index sets.
//!
//! An [`OrderedSet`] is a finite, insertion-ordered collection of unique [`IndexValue`]s.
//! A continuous set (for example time) additionally carries the tag of the
//! discretization scheme that was applied to it by the discretization transformation.

use crate::index::IndexValue;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a set owned by a [`Model`](crate::model::Model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetId(pub(crate) usize);

/// Scheme used to derive the discretization equations of a continuous set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscretizationScheme {
    BackwardDifference,
    ForwardDifference,
    CentralDifference,
    LagrangeRadau,
    LagrangeLegendre,
}

impl DiscretizationScheme {
    /// The conventional name of the scheme
    pub fn tag(&self) -> &'static str {
        match self {
            DiscretizationScheme::BackwardDifference => "BACKWARD Difference",
            DiscretizationScheme::ForwardDifference => "FORWARD Difference",
            DiscretizationScheme::CentralDifference => "CENTRAL Difference",
            DiscretizationScheme::LagrangeRadau => "LAGRANGE-RADAU",
            DiscretizationScheme::LagrangeLegendre => "LAGRANGE-LEGENDRE",
        }
    }

    /// Whether the discretization equation at each non-initial point only references
    /// the current point and its backward neighbours
    pub fn is_backward(&self) -> bool {
        matches!(
            self,
            DiscretizationScheme::BackwardDifference | DiscretizationScheme::LagrangeRadau
        )
    }
}

impl fmt::Display for DiscretizationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// An ordered, finite set of index values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedSet {
    name: String,
    values: IndexSet<IndexValue>,
    continuous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    discretization: Option<DiscretizationScheme>,
}

impl OrderedSet {
    /// Create a plain set
    ///
    /// Duplicate values are dropped, keeping the first occurrence.
    pub fn new<I, V>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<IndexValue>,
    {
        Self {
            name: name.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            continuous: false,
            discretization: None,
        }
    }

    /// Create a continuous set from its (already discretized) points
    pub fn continuous<I, V>(name: &str, points: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<IndexValue>,
    {
        Self {
            continuous: true,
            ..Self::new(name, points)
        }
    }

    /// Tag the set with the scheme that was used to discretize it
    pub fn with_discretization(mut self, scheme: DiscretizationScheme) -> Self {
        self.discretization = Some(scheme);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn discretization(&self) -> Option<DiscretizationScheme> {
        self.discretization
    }

    pub fn contains(&self, value: &IndexValue) -> bool {
        self.values.contains(value)
    }

    pub fn first(&self) -> Option<&IndexValue> {
        self.values.first()
    }

    pub fn last(&self) -> Option<&IndexValue> {
        self.values.last()
    }

    /// The value at a zero-based position
    pub fn nth(&self, position: usize) -> Option<&IndexValue> {
        self.values.get_index(position)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexValue> {
        self.values.iter()
    }

    /// The value immediately before `value`, if any
    pub fn prev(&self, value: &IndexValue) -> Option<&IndexValue> {
        let position = self.values.get_index_of(value)?;
        position
            .checked_sub(1)
            .and_then(|p| self.values.get_index(p))
    }
}
