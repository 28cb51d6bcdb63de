//! Traversal of the component hierarchy.
//!
//! [`ComponentWalker`] visits block data in prefix order starting from a root block data,
//! yielding the components found in each. Only active components are yielded, and only
//! active block data are descended into. A component reachable through more than one path
//! (via references) is yielded and descended into once.

use crate::classify::is_direct_target;
use crate::model::{ComponentId, ComponentKind, DataId, DataKind, MGraph, Model, Node};
use crate::sets::SetId;
use petgraph::graph::NodeIndex;
use petgraph::visit::{Dfs, FilterNode, NodeFiltered, VisitMap, Visitable};
use std::collections::VecDeque;

type VisitSet = <MGraph as Visitable>::Map;

/// Node filter keeping the part of the hierarchy a walk may descend through
///
/// Active components and active block data are kept, as is the block data the walk
/// starts from. Constraint data are leaves and are never kept.
#[derive(Debug, Clone, Copy)]
struct ActiveHierarchy<'m> {
    model: &'m Model,
    root: NodeIndex,
}

impl FilterNode<NodeIndex> for ActiveHierarchy<'_> {
    fn include_node(&self, node: NodeIndex) -> bool {
        if node == self.root {
            return true;
        }
        match self.model.graph().node_weight(node) {
            Some(Node::Component(component)) => component.active,
            Some(Node::Data(data)) => data.active && matches!(data.kind, DataKind::Block),
            None => false,
        }
    }
}

/// Lazy iterator over the active components below a block data
pub struct ComponentWalker<'m> {
    model: &'m Model,
    kinds: Vec<ComponentKind>,
    view: NodeFiltered<&'m MGraph, ActiveHierarchy<'m>>,
    dfs: Dfs<NodeIndex, VisitSet>,
    /// Components found in the current block data that are yet to be yielded
    pending: VecDeque<ComponentId>,
    yielded: VisitSet,
}

impl<'m> ComponentWalker<'m> {
    /// Walk the components of the given kinds below `root`
    ///
    /// The component owning `root` is not itself yielded.
    pub fn new(model: &'m Model, root: DataId, kinds: &[ComponentKind]) -> Self {
        let view = NodeFiltered(
            model.graph(),
            ActiveHierarchy {
                model,
                root: root.0,
            },
        );
        let dfs = Dfs::new(&view, root.0);
        Self {
            model,
            kinds: kinds.to_vec(),
            view,
            dfs,
            pending: VecDeque::new(),
            yielded: model.graph().visit_map(),
        }
    }

    /// Walk both blocks and constraints
    pub fn all(model: &'m Model, root: DataId) -> Self {
        Self::new(model, root, &[ComponentKind::Block, ComponentKind::Constraint])
    }

    /// Queue the active components of a block data that were not seen through another path
    fn expand(&mut self, block: DataId) {
        for child in self.model.children(block) {
            if !self.view.1.include_node(child.0) || !self.yielded.visit(child.0) {
                continue;
            }
            let Ok(component) = self.model.component(child) else {
                continue;
            };
            if self.kinds.contains(&component.kind) {
                self.pending.push_back(child);
            }
        }
    }
}

impl<'m> Iterator for ComponentWalker<'m> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(component) = self.pending.pop_front() {
                return Some(component);
            }
            // Block data come out of the depth-first search in prefix order
            let node = self.dfs.next(&self.view)?;
            if let Some(Node::Data(_)) = self.model.graph().node_weight(node) {
                self.expand(DataId(node));
            }
        }
    }
}

/// Components below `root` that are explicitly, but not implicitly, indexed by `set`
pub fn direct_targets<'m>(
    model: &'m Model,
    root: DataId,
    set: SetId,
    kinds: &[ComponentKind],
) -> impl Iterator<Item = ComponentId> + 'm {
    ComponentWalker::new(model, root, kinds).filter(move |c| is_direct_target(model, *c, set))
}

/// Active constraint data below `block`, including those inside active sub-blocks
pub fn active_constraint_data(model: &Model, block: DataId) -> impl Iterator<Item = DataId> + '_ {
    ComponentWalker::new(model, block, &[ComponentKind::Constraint]).flat_map(move |c| {
        model
            .data_of(c)
            .into_iter()
            .map(|(_, data)| data)
            .filter(move |data| model.is_active(*data))
    })
}
