//! Type definitions for the model module.

use crate::expression::Expression;
use crate::index::Index;
use crate::sets::SetId;
use crate::variable::VariableStore;
use indexmap::IndexMap;
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type alias for the component hierarchy graph.
pub type MGraph = Graph<Node, Link>;

/// Stable handle to an indexed component.
///
/// Handles are assigned when the component is constructed and are used as the
/// component's identity when the hierarchy is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub(crate) NodeIndex);

/// Stable handle to a single data instance of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataId(pub(crate) NodeIndex);

/// The two kinds of component the hierarchy is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Constraint,
    Block,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Constraint => write!(f, "Constraint"),
            ComponentKind::Block => write!(f, "Block"),
        }
    }
}

/// A single constraint `lower <= body <= upper`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintData {
    pub body: Expression,
    pub lower: f64,
    pub upper: f64,
}

impl ConstraintData {
    /// `lhs == rhs`, stored as `lhs - rhs` with both bounds at zero
    pub fn equality(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Self {
        let lhs: Expression = lhs.into();
        let rhs: Expression = rhs.into();
        Self {
            body: lhs - rhs,
            lower: 0.0,
            upper: 0.0,
        }
    }

    /// `lower <= body <= upper`
    ///
    /// Use an infinite bound for a one-sided constraint.
    pub fn bounded(lower: f64, body: impl Into<Expression>, upper: f64) -> Self {
        Self {
            body: body.into(),
            lower,
            upper,
        }
    }

    pub fn is_equality(&self) -> bool {
        self.lower == self.upper
    }

    /// Amount by which the constraint is violated at the current variable values
    ///
    /// Negative values mean that the constraint is strictly satisfied.
    pub fn violation(&self, store: &VariableStore) -> f64 {
        let body = self.body.evaluate(store);
        (body - self.upper).max(self.lower - body)
    }
}

/// An indexed component within the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    /// Declared index sets, in order
    pub index_sets: Vec<SetId>,
    pub active: bool,
    /// The block data that owns this component (`None` for the root block)
    pub parent: Option<DataId>,
    /// Data instances keyed by index, in construction order
    #[serde(with = "indexmap::map::serde_seq")]
    pub data: IndexMap<Index, DataId>,
}

impl Component {
    pub fn is_indexed(&self) -> bool {
        !self.index_sets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataKind {
    Constraint(ConstraintData),
    Block,
}

/// One instantiated data point of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentData {
    pub component: ComponentId,
    pub index: Index,
    pub active: bool,
    pub kind: DataKind,
}

/// Node in the hierarchy graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Component(Component),
    Data(ComponentData),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Component(component) => write!(f, "{} {}", component.kind, component.name),
            Node::Data(data) => write!(f, "[{}]", data.index),
        }
    }
}

/// Edge in the hierarchy graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Link {
    /// Containment: component -> data, or block data -> component
    Owns,
    /// An additional path from a block data to a component owned elsewhere
    References,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Owns => write!(f, "owns"),
            Link::References => write!(f, "references"),
        }
    }
}
