//! Index algebra around a distinguished set.
//!
//! For a component indexed by `(s_1, ..., T, ..., s_n)` the *complement* of `T` is the
//! Cartesian product of every other index set, in declared order. Combining an element of
//! the complement with a point of `T` reconstructs a full index of the component:
//!
//! - with no other sets the complement holds only the scalar index and the full index is
//!   the point alone
//! - with one other set the full index is a pair in declared order
//! - with more, the point is inserted into the flattened tuple at the position of `T`

use crate::errors::{InitCondError, InitCondResult};
use crate::index::{Index, IndexValue};
use crate::model::{ComponentId, Model};
use crate::sets::SetId;

/// The complement of a set within a component's index sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementIndex {
    /// Position of the distinguished set in the component's index sets
    position: usize,
    /// The other index sets, in declared order
    other_sets: Vec<SetId>,
    indices: Vec<Index>,
}

impl ComplementIndex {
    /// Reinsert `point` at the position of the distinguished set
    pub fn combine(&self, other: &Index, point: &IndexValue) -> Index {
        if self.other_sets.is_empty() {
            return Index::from(point.clone());
        }
        other.with_inserted(self.position, point.clone())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn other_sets(&self) -> &[SetId] {
        &self.other_sets
    }

    pub fn iter(&self) -> impl Iterator<Item = &Index> {
        self.indices.iter()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<'a> IntoIterator for &'a ComplementIndex {
    type Item = &'a Index;
    type IntoIter = std::slice::Iter<'a, Index>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

/// Compute the complement of `set` within the index sets of `component`
///
/// Returns [`InitCondError::NotIndexed`] unless `set` appears exactly once in the
/// component's index sets.
pub fn complement(
    model: &Model,
    component: ComponentId,
    set: SetId,
) -> InitCondResult<ComplementIndex> {
    let index_sets = &model.component(component)?.index_sets;
    let occurrences = index_sets.iter().filter(|s| **s == set).count();
    let position = match (occurrences, index_sets.iter().position(|s| *s == set)) {
        (1, Some(position)) => position,
        _ => {
            return Err(InitCondError::NotIndexed {
                component: model.component_name(component),
                set: model.set(set).name().to_string(),
                occurrences,
            })
        }
    };

    let other_sets: Vec<SetId> = index_sets
        .iter()
        .filter(|s| **s != set)
        .copied()
        .collect();
    let indices = model.index_product(&other_sets);

    Ok(ComplementIndex {
        position,
        other_sets,
        indices,
    })
}
