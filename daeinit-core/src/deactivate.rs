//! Deactivation of a model at selected points of a set.

use crate::complement::complement;
use crate::errors::{InitCondError, InitCondResult};
use crate::index::{Index, IndexValue};
use crate::model::{ComponentId, ComponentKind, DataId, Model};
use crate::sets::SetId;
use crate::walker::direct_targets;
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

/// How to treat index combinations that have no data.
///
/// Sparse components legitimately skip some indices (for example a discretization
/// equation has no entry at the first time point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipPolicy {
    /// Continue past missing entries instead of returning [`InitCondError::MissingIndex`]
    pub allow_skip: bool,
    /// Do not log a warning for missing entries
    pub suppress_warnings: bool,
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self {
            allow_skip: true,
            suppress_warnings: false,
        }
    }
}

impl SkipPolicy {
    /// Strict lookups, no warnings
    pub fn strict() -> Self {
        Self {
            allow_skip: false,
            suppress_warnings: true,
        }
    }

    /// Apply the policy to a failed lookup of `index` in `component`
    pub(crate) fn on_missing(
        &self,
        model: &Model,
        component: ComponentId,
        index: &Index,
    ) -> InitCondResult<()> {
        if !self.suppress_warnings {
            warn!("{} has no index {}", model.component_name(component), index);
        }
        if self.allow_skip {
            Ok(())
        } else {
            Err(InitCondError::MissingIndex {
                component: model.component_name(component),
                index: index.to_string(),
            })
        }
    }
}

/// Data deactivated at each requested point, in the order the points were requested
pub type Deactivated = IndexMap<IndexValue, Vec<DataId>>;

/// Check that every point is a member of `set`
pub(crate) fn validate_points(
    model: &Model,
    set: SetId,
    points: &[IndexValue],
) -> InitCondResult<()> {
    let ordered = model.set(set);
    match points.iter().find(|pt| !ordered.contains(pt)) {
        Some(point) => Err(InitCondError::InvalidPoint {
            point: point.to_string(),
            set: ordered.name().to_string(),
        }),
        None => Ok(()),
    }
}

/// Deactivate every block and constraint below `root` indexed explicitly (and not
/// implicitly) by `set`, at each of `points`.
///
/// Implicitly indexed components are left untouched: the block data that contains them is
/// deactivated instead.
///
/// All points are validated before anything is modified. A missing index combination is
/// handled according to `policy`; when it results in an error, data deactivated before the
/// failure stay deactivated.
///
/// Returns, for each point, the data that were deactivated there.
pub fn deactivate_model_at(
    model: &mut Model,
    root: DataId,
    set: SetId,
    points: &[IndexValue],
    policy: SkipPolicy,
) -> InitCondResult<Deactivated> {
    validate_points(model, set, points)?;

    let mut deactivated: Deactivated = points.iter().map(|pt| (pt.clone(), vec![])).collect();

    let targets: Vec<ComponentId> = direct_targets(
        model,
        root,
        set,
        &[ComponentKind::Block, ComponentKind::Constraint],
    )
    .collect();

    for component in targets {
        let info = complement(model, component, set)?;
        for other in &info {
            for point in points {
                let index = info.combine(other, point);
                match model.lookup(component, &index) {
                    Some(data) => {
                        model.deactivate(data)?;
                        if let Some(list) = deactivated.get_mut(point) {
                            list.push(data);
                        }
                    }
                    None => policy.on_missing(model, component, &index)?,
                }
            }
        }
    }

    Ok(deactivated)
}

/// Reactivate everything recorded by [`deactivate_model_at`]
pub fn reactivate(model: &mut Model, deactivated: &Deactivated) -> InitCondResult<()> {
    for data in deactivated.values().flatten() {
        model.activate(*data)?;
    }
    Ok(())
}
