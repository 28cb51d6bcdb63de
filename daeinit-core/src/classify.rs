//! Explicit and implicit indexing by a set.
//!
//! A component is *explicitly* indexed by a set when the set is one of its own declared
//! index sets. It is *implicitly* indexed when one of the blocks it lives in is explicitly
//! indexed by the set: each of its instances then belongs to a specific point of the set
//! through its containing block data.
//!
//! Operations that act "at a point of the set" only target components that are explicitly
//! but not implicitly indexed. Implicitly indexed components are handled through the
//! containing block, so acting on them as well would process the same entity twice.

use crate::model::{ComponentId, Model};
use crate::sets::SetId;

/// True if `set` is one of the component's declared index sets
pub fn is_explicitly_indexed_by(model: &Model, component: ComponentId, set: SetId) -> bool {
    model
        .component(component)
        .map(|c| c.index_sets.contains(&set))
        .unwrap_or(false)
}

/// True if any strict ancestor block of the component is explicitly indexed by `set`
pub fn is_in_block_indexed_by(model: &Model, component: ComponentId, set: SetId) -> bool {
    let mut parent = model.parent_block(component);
    while let Some(data) = parent {
        let Ok(owner) = model.component_of(data) else {
            return false;
        };
        if is_explicitly_indexed_by(model, owner, set) {
            return true;
        }
        parent = model.parent_block(owner);
    }
    false
}

/// Whether a component should be acted on directly for points of `set`
pub fn is_direct_target(model: &Model, component: ComponentId, set: SetId) -> bool {
    is_explicitly_indexed_by(model, component, set)
        && !is_in_block_indexed_by(model, component, set)
}
