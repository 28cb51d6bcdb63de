//! Lookups, naming and activation state.

use crate::errors::{InitCondError, InitCondResult};
use crate::expression::Expression;
use crate::index::Index;
use crate::sets::{OrderedSet, SetId};
use crate::variable::VariableStore;
use itertools::Itertools;
use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::types::{
    Component, ComponentData, ComponentId, ConstraintData, DataId, DataKind, MGraph, Node,
};
use super::Model;

impl Model {
    /// The data instance of the root block
    pub fn root(&self) -> DataId {
        self.root
    }

    pub fn root_component(&self) -> ComponentId {
        self.root_component
    }

    pub(crate) fn graph(&self) -> &MGraph {
        &self.graph
    }

    /// Get a set by handle
    ///
    /// # Panics
    ///
    /// Panics if the handle was not created by this model.
    pub fn set(&self, id: SetId) -> &OrderedSet {
        &self.sets[id.0]
    }

    /// Mutable access to a set, for example to tag it with a discretization scheme.
    pub fn set_mut(&mut self, id: SetId) -> &mut OrderedSet {
        &mut self.sets[id.0]
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }

    /// Evaluate an expression using the current variable values
    pub fn evaluate(&self, expression: &Expression) -> f64 {
        expression.evaluate(&self.variables)
    }

    pub fn component(&self, id: ComponentId) -> InitCondResult<&Component> {
        match self.graph.node_weight(id.0) {
            Some(Node::Component(component)) => Ok(component),
            _ => Err(InitCondError::Error(format!("{:?} is not a component", id))),
        }
    }

    fn component_mut(&mut self, id: ComponentId) -> InitCondResult<&mut Component> {
        match self.graph.node_weight_mut(id.0) {
            Some(Node::Component(component)) => Ok(component),
            _ => Err(InitCondError::Error(format!("{:?} is not a component", id))),
        }
    }

    pub fn data(&self, id: DataId) -> InitCondResult<&ComponentData> {
        match self.graph.node_weight(id.0) {
            Some(Node::Data(data)) => Ok(data),
            _ => Err(InitCondError::Error(format!("{:?} is not component data", id))),
        }
    }

    fn data_mut(&mut self, id: DataId) -> InitCondResult<&mut ComponentData> {
        match self.graph.node_weight_mut(id.0) {
            Some(Node::Data(data)) => Ok(data),
            _ => Err(InitCondError::Error(format!("{:?} is not component data", id))),
        }
    }

    /// Look up the data instance of a component at `index`
    ///
    /// Returns `None` if the component has no data at that index (for example because the
    /// constraint rule skipped it).
    pub fn lookup(&self, component: ComponentId, index: &Index) -> Option<DataId> {
        self.component(component)
            .ok()
            .and_then(|c| c.data.get(index).copied())
    }

    /// All data instances of a component in construction order
    pub fn data_of(&self, component: ComponentId) -> Vec<(Index, DataId)> {
        self.component(component)
            .map(|c| c.data.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }

    /// The data instance of a scalar component
    pub fn scalar_data(&self, component: ComponentId) -> Option<DataId> {
        self.lookup(component, &Index::scalar())
    }

    /// Components directly reachable from a block data, owned or referenced,
    /// in the order they were added.
    pub fn children(&self, block: DataId) -> Vec<ComponentId> {
        self.graph
            .edges_directed(block.0, Direction::Outgoing)
            .sorted_by_key(|edge| edge.id())
            .map(|edge| ComponentId(edge.target()))
            .collect()
    }

    /// The block data that owns a component
    pub fn parent_block(&self, component: ComponentId) -> Option<DataId> {
        self.component(component).ok().and_then(|c| c.parent)
    }

    /// The component a data instance belongs to
    pub fn component_of(&self, data: DataId) -> InitCondResult<ComponentId> {
        self.data(data).map(|d| d.component)
    }

    pub fn constraint(&self, data: DataId) -> Option<&ConstraintData> {
        match self.data(data) {
            Ok(ComponentData {
                kind: DataKind::Constraint(constraint),
                ..
            }) => Some(constraint),
            _ => None,
        }
    }

    pub fn is_active(&self, data: DataId) -> bool {
        self.data(data).map(|d| d.active).unwrap_or(false)
    }

    pub fn activate(&mut self, data: DataId) -> InitCondResult<()> {
        self.data_mut(data)?.active = true;
        Ok(())
    }

    pub fn deactivate(&mut self, data: DataId) -> InitCondResult<()> {
        self.data_mut(data)?.active = false;
        Ok(())
    }

    pub fn is_component_active(&self, component: ComponentId) -> bool {
        self.component(component).map(|c| c.active).unwrap_or(false)
    }

    /// Deactivate a whole component, independently of the flags of its data
    pub fn deactivate_component(&mut self, component: ComponentId) -> InitCondResult<()> {
        self.component_mut(component)?.active = false;
        Ok(())
    }

    pub fn activate_component(&mut self, component: ComponentId) -> InitCondResult<()> {
        self.component_mut(component)?.active = true;
        Ok(())
    }

    /// Fully qualified name of a component, e.g. `fs.b2[0, a].b3`
    pub fn component_name(&self, component: ComponentId) -> String {
        let Ok(c) = self.component(component) else {
            return format!("{:?}", component);
        };
        match c.parent {
            Some(parent) if parent != self.root => {
                format!("{}.{}", self.data_name(parent), c.name)
            }
            _ => c.name.clone(),
        }
    }

    /// Fully qualified name of a data instance, e.g. `fs.con1[2]`
    pub fn data_name(&self, data: DataId) -> String {
        let Ok(d) = self.data(data) else {
            return format!("{:?}", data);
        };
        let name = self.component_name(d.component);
        if d.index.is_empty() {
            name
        } else {
            format!("{}[{}]", name, d.index.values().iter().join(", "))
        }
    }

    /// Cartesian product of the values of `sets`, preserving their order
    ///
    /// An empty list of sets produces the single scalar index.
    pub fn index_product(&self, sets: &[SetId]) -> Vec<Index> {
        if sets.is_empty() {
            return vec![Index::scalar()];
        }
        sets.iter()
            .map(|id| self.set(*id).iter().cloned().collect::<Vec<_>>())
            .multi_cartesian_product()
            .map(Index::new)
            .collect()
    }

    /// Render the hierarchy in graphviz format
    pub fn as_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }
}
