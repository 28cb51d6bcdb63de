//! Construction of the component hierarchy.

use crate::errors::{InitCondError, InitCondResult};
use crate::index::Index;
use crate::sets::{OrderedSet, SetId};
use crate::variable::{VarId, VariableStore};
use indexmap::IndexMap;
use itertools::Itertools;
use petgraph::Graph;

use super::types::{
    Component, ComponentData, ComponentId, ComponentKind, ConstraintData, DataId, DataKind,
    Link, Node,
};
use super::Model;

impl Model {
    /// Create an empty model consisting of only the root block
    pub fn new() -> Self {
        let mut graph = Graph::new();
        let root_component = graph.add_node(Node::Component(Component {
            name: String::new(),
            kind: ComponentKind::Block,
            index_sets: vec![],
            active: true,
            parent: None,
            data: IndexMap::new(),
        }));
        let root = graph.add_node(Node::Data(ComponentData {
            component: ComponentId(root_component),
            index: Index::scalar(),
            active: true,
            kind: DataKind::Block,
        }));
        graph.add_edge(root_component, root, Link::Owns);
        if let Node::Component(component) = &mut graph[root_component] {
            component.data.insert(Index::scalar(), DataId(root));
        }

        Self {
            graph,
            root_component: ComponentId(root_component),
            root: DataId(root),
            sets: vec![],
            variables: VariableStore::new(),
        }
    }

    /// Register an index set with the model.
    pub fn add_set(&mut self, set: OrderedSet) -> SetId {
        self.sets.push(set);
        SetId(self.sets.len() - 1)
    }

    /// Add a single variable with an initial value.
    pub fn add_var(&mut self, name: &str, value: f64) -> VarId {
        self.variables.add(name, value)
    }

    /// Add one variable per element of the Cartesian product of `sets`.
    ///
    /// Variables are named `name[index]`.
    pub fn add_indexed_var(
        &mut self,
        name: &str,
        sets: &[SetId],
        value: f64,
    ) -> IndexMap<Index, VarId> {
        self.index_product(sets)
            .into_iter()
            .map(|index| {
                let name = format!("{}[{}]", name, index.values().iter().join(", "));
                let id = self.variables.add(&name, value);
                (index, id)
            })
            .collect()
    }

    /// Add a block to `parent`, with one data instance per index.
    ///
    /// Blocks are constructed densely; use [`Model::data_of`] to populate the new data
    /// instances.
    ///
    /// Returns an error if `parent` is not a block data instance.
    pub fn add_block(
        &mut self,
        parent: DataId,
        name: &str,
        sets: &[SetId],
    ) -> InitCondResult<ComponentId> {
        let indices = self.index_product(sets);
        let component = self.add_component(parent, name, ComponentKind::Block, sets)?;
        for index in indices {
            self.add_data(component, index, DataKind::Block);
        }
        Ok(component)
    }

    /// Add a constraint to `parent`.
    ///
    /// The `rule` is called once for each index in the Cartesian product of `sets`.
    /// Returning `None` skips that index, leaving a gap in the component's index space.
    pub fn add_constraint<F>(
        &mut self,
        parent: DataId,
        name: &str,
        sets: &[SetId],
        mut rule: F,
    ) -> InitCondResult<ComponentId>
    where
        F: FnMut(&Index) -> Option<ConstraintData>,
    {
        let indices = self.index_product(sets);
        let component = self.add_component(parent, name, ComponentKind::Constraint, sets)?;
        for index in indices {
            if let Some(constraint) = rule(&index) {
                self.add_data(component, index, DataKind::Constraint(constraint));
            }
        }
        Ok(component)
    }

    /// Make an existing component reachable from `parent` as well.
    ///
    /// The component keeps its owner; only an additional path into the hierarchy is added.
    pub fn add_reference(&mut self, parent: DataId, target: ComponentId) -> InitCondResult<()> {
        self.require_block_data(parent)?;
        self.component(target)?;
        self.graph.add_edge(parent.0, target.0, Link::References);
        Ok(())
    }

    fn require_block_data(&self, id: DataId) -> InitCondResult<()> {
        match self.graph.node_weight(id.0) {
            Some(Node::Data(ComponentData {
                kind: DataKind::Block,
                ..
            })) => Ok(()),
            _ => Err(InitCondError::Error(format!(
                "{:?} is not the data of a block",
                id
            ))),
        }
    }

    fn add_component(
        &mut self,
        parent: DataId,
        name: &str,
        kind: ComponentKind,
        sets: &[SetId],
    ) -> InitCondResult<ComponentId> {
        self.require_block_data(parent)?;
        if let Some(set) = sets.iter().find(|s| s.0 >= self.sets.len()) {
            return Err(InitCondError::Error(format!(
                "Unknown set {:?} used by component {}",
                set, name
            )));
        }

        let node = self.graph.add_node(Node::Component(Component {
            name: name.to_string(),
            kind,
            index_sets: sets.to_vec(),
            active: true,
            parent: Some(parent),
            data: IndexMap::new(),
        }));
        self.graph.add_edge(parent.0, node, Link::Owns);
        Ok(ComponentId(node))
    }

    fn add_data(&mut self, component: ComponentId, index: Index, kind: DataKind) -> DataId {
        let node = self.graph.add_node(Node::Data(ComponentData {
            component,
            index: index.clone(),
            active: true,
            kind,
        }));
        self.graph.add_edge(component.0, node, Link::Owns);
        if let Node::Component(c) = &mut self.graph[component.0] {
            c.data.insert(index, DataId(node));
        }
        DataId(node)
    }
}
