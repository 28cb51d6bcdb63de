//! Solving for consistent initial conditions.
//!
//! The model is deactivated at every point of the set except the first, solved, and then
//! reactivated. Only the equations at the initial point take part in the solve.

use crate::deactivate::{deactivate_model_at, reactivate, Deactivated, SkipPolicy};
use crate::errors::{InitCondError, InitCondResult};
use crate::index::IndexValue;
use crate::model::{DataId, Model};
use crate::sets::SetId;
use crate::solver::{Solver, SolverResults};
use log::{debug, error, info};
use std::ops::{Deref, DerefMut};

/// Keeps part of a model deactivated for as long as it is alive.
///
/// Everything recorded in the guard is reactivated when it is dropped, whether the work
/// done in between succeeded, failed or panicked.
pub struct ActivationGuard<'m> {
    model: &'m mut Model,
    deactivated: Deactivated,
}

impl<'m> ActivationGuard<'m> {
    /// Deactivate `model` at `points` (see [`deactivate_model_at`]) until the guard is dropped
    pub fn deactivate_at(
        model: &'m mut Model,
        root: DataId,
        set: SetId,
        points: &[IndexValue],
        policy: SkipPolicy,
    ) -> InitCondResult<Self> {
        let deactivated = deactivate_model_at(model, root, set, points, policy)?;
        Ok(Self { model, deactivated })
    }

    /// The data deactivated at each point
    pub fn deactivated(&self) -> &Deactivated {
        &self.deactivated
    }
}

impl Deref for ActivationGuard<'_> {
    type Target = Model;

    fn deref(&self) -> &Model {
        self.model
    }
}

impl DerefMut for ActivationGuard<'_> {
    fn deref_mut(&mut self) -> &mut Model {
        self.model
    }
}

impl Drop for ActivationGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = reactivate(self.model, &self.deactivated) {
            error!("Failed to reactivate model: {}", e);
        }
    }
}

/// Solve `model` with everything indexed by `set` deactivated except at its first point.
///
/// Only backward discretization schemes are supported: with those, the discretization
/// equation at a point references only that point and earlier ones, so deactivating every
/// later point leaves no equation at the initial point that refers to them.
///
/// All deactivated data are reactivated once the solver returns, including when it returns
/// an error. The solver's results are returned unmodified.
pub fn solve_consistent_initial_conditions(
    model: &mut Model,
    set: SetId,
    solver: &dyn Solver,
) -> InitCondResult<SolverResults> {
    let ordered = model.set(set);
    match ordered.discretization() {
        Some(scheme) if scheme.is_backward() => {}
        Some(scheme) => return Err(InitCondError::UnsupportedScheme(scheme.to_string())),
        None => {
            return Err(InitCondError::UnsupportedScheme(format!(
                "Undiscretized set {}",
                ordered.name()
            )))
        }
    }

    let rest: Vec<IndexValue> = ordered.iter().skip(1).cloned().collect();
    info!(
        "Solving for initial conditions at {} = {}",
        ordered.name(),
        ordered
            .first()
            .map(|t| t.to_string())
            .unwrap_or_default()
    );

    let root = model.root();
    let mut guard =
        ActivationGuard::deactivate_at(model, root, set, &rest, SkipPolicy::default())?;
    debug!(
        "Deactivated {} data across {} points",
        guard.deactivated().values().map(Vec::len).sum::<usize>(),
        rest.len()
    );

    solver.solve(&mut guard)
}
