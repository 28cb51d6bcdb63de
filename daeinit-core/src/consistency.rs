//! Consistency of constraints at the initial point of a set.

use crate::classify::is_explicitly_indexed_by;
use crate::complement::complement;
use crate::deactivate::{validate_points, SkipPolicy};
use crate::errors::{InitCondError, InitCondResult};
use crate::index::IndexValue;
use crate::model::{ComponentId, ComponentKind, DataId, Model};
use crate::sets::SetId;
use crate::walker::{direct_targets, ComponentWalker};
use indexmap::IndexSet;
use log::debug;
use serde::{Deserialize, Serialize};

/// Options for [`get_inconsistent_initial_conditions`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Maximum allowed constraint violation
    pub tolerance: f64,
    /// Point at which to check; the first point of the set when `None`
    pub t0: Option<IndexValue>,
    pub policy: SkipPolicy,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            t0: None,
            policy: SkipPolicy::default(),
        }
    }
}

fn is_violated(model: &Model, data: DataId, tolerance: f64) -> bool {
    model
        .constraint(data)
        .map(|c| c.violation(model.variables()) > tolerance)
        .unwrap_or(false)
}

/// Find the constraint data indexed by `set`, explicitly or through a containing block,
/// that are violated by more than `options.tolerance` at the initial point.
///
/// Explicitly indexed constraints are checked at `t0` for every element of their
/// complement index. For explicitly indexed blocks the block data at `t0` is searched for
/// active constraints, descending through sub-blocks. Blocks indexed by `set` nested in
/// another block indexed by `set` are not supported and result in
/// [`InitCondError::UnsupportedNesting`].
///
/// The result holds each inconsistent data once, in the order found.
pub fn get_inconsistent_initial_conditions(
    model: &Model,
    root: DataId,
    set: SetId,
    options: &CheckOptions,
) -> InitCondResult<Vec<DataId>> {
    let t0 = match &options.t0 {
        Some(t0) => {
            validate_points(model, set, std::slice::from_ref(t0))?;
            t0.clone()
        }
        None => model.set(set).first().cloned().ok_or_else(|| {
            InitCondError::Error(format!("Set {} is empty", model.set(set).name()))
        })?,
    };

    let mut inconsistent: IndexSet<DataId> = IndexSet::new();

    let constraints: Vec<ComponentId> =
        direct_targets(model, root, set, &[ComponentKind::Constraint]).collect();
    for component in constraints {
        let info = complement(model, component, set)?;
        for other in &info {
            let index = info.combine(other, &t0);
            let Some(data) = model.lookup(component, &index) else {
                options.policy.on_missing(model, component, &index)?;
                continue;
            };
            if is_violated(model, data, options.tolerance) {
                inconsistent.insert(data);
            }
        }
    }

    let blocks: Vec<ComponentId> =
        direct_targets(model, root, set, &[ComponentKind::Block]).collect();
    for component in blocks {
        let info = complement(model, component, set)?;
        for other in &info {
            let index = info.combine(other, &t0);
            let Some(block) = model.lookup(component, &index) else {
                options.policy.on_missing(model, component, &index)?;
                continue;
            };
            if !model.is_active(block) {
                continue;
            }
            check_block(model, block, set, options.tolerance, &mut inconsistent)?;
        }
    }

    debug!(
        "{} inconsistent constraints at {} = {}",
        inconsistent.len(),
        model.set(set).name(),
        t0
    );
    Ok(inconsistent.into_iter().collect())
}

/// Check the active constraints inside a block data indexed by the set
fn check_block(
    model: &Model,
    block: DataId,
    set: SetId,
    tolerance: f64,
    inconsistent: &mut IndexSet<DataId>,
) -> InitCondResult<()> {
    for component in ComponentWalker::all(model, block) {
        if is_explicitly_indexed_by(model, component, set) {
            let kind = model.component(component)?.kind;
            if kind == ComponentKind::Block {
                return Err(InitCondError::UnsupportedNesting {
                    component: model.component_name(component),
                });
            }
        }
        for (_, data) in model.data_of(component) {
            if !model.is_active(data) || !is_violated(model, data, tolerance) {
                continue;
            }
            if !inconsistent.insert(data) {
                return Err(InitCondError::UnsupportedNesting {
                    component: model.data_name(data),
                });
            }
        }
    }
    Ok(())
}
