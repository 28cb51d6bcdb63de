//! A model is a tree of blocks and constraints, indexed by ordered sets.
//!
//! Every component (a constraint or a block) declares a tuple of index sets and owns one
//! data instance per index. Block data in turn own further components, so the model forms a
//! hierarchy rooted at a single scalar block.
//! Components can also be reachable from more than one block through references; the
//! component handles double as identities so that traversals can deduplicate them.
//!
//! The model only stores structure, activation state, constraint expressions and variable
//! values. Building the discretization equations and solving are the job of external
//! collaborators.

mod access;
mod builder;
mod types;

#[cfg(test)]
mod tests;

use crate::sets::OrderedSet;
use crate::variable::VariableStore;
use serde::{Deserialize, Serialize};

pub use types::{
    Component, ComponentData, ComponentId, ComponentKind, ConstraintData, DataId, DataKind,
    Link, MGraph, Node,
};

/// A hierarchical model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Components and data as nodes, containment and references as edges.
    graph: MGraph,
    /// The root scalar block
    root_component: ComponentId,
    /// The single data instance of the root block
    root: DataId,
    sets: Vec<OrderedSet>,
    variables: VariableStore,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
