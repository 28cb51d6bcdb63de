//! Gauss-Newton solver for the active constraints of a model
//!
//! The unknowns are the unfixed variables referenced by the active constraints below the root
//! block. Each iteration linearises the residuals and takes the minimum-norm least-squares
//! step, so square, under- and over-determined systems are all handled:
//! $$ J \Delta x = -r $$
//!
//! An equality constraint contributes its residual `body - upper` at every iteration.
//! An inequality constraint only contributes while it is violated, with the residual measured
//! to the nearest bound.

use daeinit_core::errors::InitCondResult;
use daeinit_core::model::{ConstraintData, Model};
use daeinit_core::solver::{Solver, SolverResults, TerminationCondition};
use daeinit_core::variable::{VarId, VariableStore};
use daeinit_core::walker::active_constraint_data;
use indexmap::IndexSet;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Number of step scales tried, halving each time, before the search gives up
const MAX_LINE_SEARCH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonSolver {
    pub max_iterations: usize,
    /// Largest absolute residual accepted as converged
    pub tolerance: f64,
    /// Singular values below this are treated as zero
    pub svd_epsilon: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1e-10,
            svd_epsilon: 1e-14,
        }
    }
}

impl NewtonSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

/// Residual of a constraint, zero when it is satisfied
fn residual(constraint: &ConstraintData, store: &VariableStore) -> f64 {
    let body = constraint.body.evaluate(store);
    if constraint.is_equality() {
        body - constraint.upper
    } else if body > constraint.upper {
        body - constraint.upper
    } else if body < constraint.lower {
        body - constraint.lower
    } else {
        0.0
    }
}

fn residuals(constraints: &[ConstraintData], store: &VariableStore) -> DVector<f64> {
    DVector::from_iterator(
        constraints.len(),
        constraints.iter().map(|c| residual(c, store)),
    )
}

fn jacobian(
    constraints: &[ConstraintData],
    unknowns: &IndexSet<VarId>,
    r: &DVector<f64>,
    store: &VariableStore,
) -> DMatrix<f64> {
    DMatrix::from_fn(constraints.len(), unknowns.len(), |i, j| {
        // Satisfied inequalities are left out of the step
        if r[i] == 0.0 && !constraints[i].is_equality() {
            return 0.0;
        }
        unknowns
            .get_index(j)
            .map(|var| constraints[i].body.partial_derivative(*var, store))
            .unwrap_or(0.0)
    })
}

fn restore(store: &mut VariableStore, unknowns: &IndexSet<VarId>, x0: &[f64]) {
    for (var, value) in unknowns.iter().zip(x0) {
        store.set_value(*var, *value);
    }
}

fn apply_step(
    store: &mut VariableStore,
    unknowns: &IndexSet<VarId>,
    x0: &[f64],
    step: &DVector<f64>,
    alpha: f64,
) {
    for (j, var) in unknowns.iter().enumerate() {
        store.set_value(*var, x0[j] + alpha * step[j]);
    }
}

#[typetag::serde]
impl Solver for NewtonSolver {
    fn solve(&self, model: &mut Model) -> InitCondResult<SolverResults> {
        let root = model.root();
        let constraints: Vec<ConstraintData> = active_constraint_data(model, root)
            .filter_map(|data| model.constraint(data).cloned())
            .collect();

        let store = model.variables_mut();
        let unknowns: IndexSet<VarId> = constraints
            .iter()
            .flat_map(|c| c.body.variables())
            .filter(|var| !store.is_fixed(*var))
            .collect();
        debug!(
            "Solving {} active constraints for {} unknowns",
            constraints.len(),
            unknowns.len()
        );

        let mut r = residuals(&constraints, store);
        let mut iterations = 0;
        let termination = loop {
            let max_residual = r.amax();
            if max_residual <= self.tolerance {
                break TerminationCondition::Converged;
            }
            if iterations >= self.max_iterations {
                break TerminationCondition::MaxIterations;
            }
            if unknowns.is_empty() {
                break TerminationCondition::Singular;
            }

            let jac = jacobian(&constraints, &unknowns, &r, store);
            let step = match jac.svd(true, true).solve(&(-&r), self.svd_epsilon) {
                Ok(step) => step,
                Err(e) => {
                    debug!("SVD solve failed: {}", e);
                    break TerminationCondition::Singular;
                }
            };
            if step.amax() == 0.0 {
                break TerminationCondition::Singular;
            }

            // Backtrack until the residual norm decreases
            let x0: Vec<f64> = unknowns.iter().map(|var| store.value(*var)).collect();
            let norm0 = r.norm();
            let mut scale = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_LINE_SEARCH {
                apply_step(store, &unknowns, &x0, &step, scale);
                if residuals(&constraints, store).norm() < norm0 {
                    accepted = Some(scale);
                    break;
                }
                scale *= 0.5;
            }
            iterations += 1;
            let Some(alpha) = accepted else {
                restore(store, &unknowns, &x0);
                debug!(
                    "Iteration {}: no step scale down to {} reduced the residual",
                    iterations,
                    2.0 * scale
                );
                break TerminationCondition::Singular;
            };
            r = residuals(&constraints, store);
            debug!(
                "Iteration {}: max residual {:e}, step scale {}",
                iterations,
                r.amax(),
                alpha
            );
        };

        let max_residual = r.amax();
        info!(
            "Newton solver finished after {} iterations ({:?}), max residual {:e}",
            iterations, termination, max_residual
        );
        let message = match termination {
            TerminationCondition::Singular if unknowns.is_empty() => {
                Some("No unfixed variables in the active constraints".to_string())
            }
            TerminationCondition::Singular => Some("Could not find a descent step".to_string()),
            _ => None,
        };

        Ok(SolverResults {
            termination,
            iterations,
            max_residual,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daeinit_core::expression::Expression;
    use daeinit_core::index;
    use daeinit_core::sets::OrderedSet;
    use is_close::is_close;

    #[test]
    fn square_linear_system() {
        let mut model = Model::new();
        let x = model.add_var("x", 0.0);
        let y = model.add_var("y", 0.0);
        let root = model.root();
        model
            .add_constraint(root, "sum", &[], |_| {
                Some(ConstraintData::equality(Expression::var(x) + Expression::var(y), 3.0))
            })
            .unwrap();
        model
            .add_constraint(root, "diff", &[], |_| {
                Some(ConstraintData::equality(Expression::var(x) - Expression::var(y), 1.0))
            })
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert!(results.converged());
        assert_eq!(results.iterations, 1);
        assert!(is_close!(model.variables().value(x), 2.0));
        assert!(is_close!(model.variables().value(y), 1.0));
    }

    #[test]
    fn nonlinear_equation() {
        let mut model = Model::new();
        let x = model.add_var("x", 1.0);
        let root = model.root();
        model
            .add_constraint(root, "square", &[], |_| {
                Some(ConstraintData::equality(Expression::var(x) * Expression::var(x), 2.0))
            })
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert!(results.converged());
        assert!(results.iterations > 1);
        assert!(is_close!(model.variables().value(x), 2.0_f64.sqrt()));
    }

    #[test]
    fn fixed_variables_are_not_moved() {
        let mut model = Model::new();
        let x = model.add_var("x", 4.0);
        let y = model.add_var("y", 0.0);
        model.variables_mut().fix(x);
        let root = model.root();
        model
            .add_constraint(root, "con", &[], |_| {
                Some(ConstraintData::equality(y, 2.0 * Expression::var(x)))
            })
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert!(results.converged());
        assert_eq!(model.variables().value(x), 4.0);
        assert!(is_close!(model.variables().value(y), 8.0));
    }

    #[test]
    fn underdetermined_takes_minimum_norm_step() {
        let mut model = Model::new();
        let x = model.add_var("x", 0.0);
        let y = model.add_var("y", 0.0);
        let root = model.root();
        model
            .add_constraint(root, "sum", &[], |_| {
                Some(ConstraintData::equality(Expression::var(x) + Expression::var(y), 2.0))
            })
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert!(results.converged());
        assert!(is_close!(model.variables().value(x), 1.0));
        assert!(is_close!(model.variables().value(y), 1.0));
    }

    #[test]
    fn satisfied_inequality_is_ignored() {
        let mut model = Model::new();
        let x = model.add_var("x", 0.5);
        let y = model.add_var("y", 0.0);
        let root = model.root();
        model
            .add_constraint(root, "bound", &[], |_| {
                Some(ConstraintData::bounded(0.0, x, 1.0))
            })
            .unwrap();
        model
            .add_constraint(root, "eq", &[], |_| Some(ConstraintData::equality(y, 3.0)))
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert!(results.converged());
        assert!(is_close!(model.variables().value(x), 0.5));
        assert!(is_close!(model.variables().value(y), 3.0));
    }

    #[test]
    fn violated_inequality_moves_to_bound() {
        let mut model = Model::new();
        let x = model.add_var("x", 5.0);
        let root = model.root();
        model
            .add_constraint(root, "bound", &[], |_| {
                Some(ConstraintData::bounded(f64::NEG_INFINITY, x, 1.0))
            })
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert!(results.converged());
        assert!(is_close!(model.variables().value(x), 1.0));
    }

    #[test]
    fn inactive_constraints_are_not_solved() {
        let mut model = Model::new();
        let time = model.add_set(OrderedSet::continuous("time", [0.0, 1.0]));
        let x = model.add_indexed_var("x", &[time], 0.0);
        let root = model.root();
        let con = model
            .add_constraint(root, "con", &[time], |idx| {
                Some(ConstraintData::equality(x[idx], 1.0))
            })
            .unwrap();
        let later = model.lookup(con, &index![1.0]).unwrap();
        model.deactivate(later).unwrap();

        NewtonSolver::new().solve(&mut model).unwrap();

        assert!(is_close!(model.variables().value(x[&index![0.0]]), 1.0));
        assert_eq!(model.variables().value(x[&index![1.0]]), 0.0);
    }

    #[test]
    fn no_free_variables() {
        let mut model = Model::new();
        let x = model.add_var("x", 0.0);
        model.variables_mut().fix(x);
        let root = model.root();
        model
            .add_constraint(root, "con", &[], |_| Some(ConstraintData::equality(x, 1.0)))
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert_eq!(results.termination, TerminationCondition::Singular);
        assert!(is_close!(results.max_residual, 1.0));
        assert!(results.message.is_some());
    }

    #[test]
    fn iteration_limit() {
        let mut model = Model::new();
        let x = model.add_var("x", 1.0);
        let root = model.root();
        model
            .add_constraint(root, "square", &[], |_| {
                Some(ConstraintData::equality(Expression::var(x) * Expression::var(x), 2.0))
            })
            .unwrap();

        let results = NewtonSolver::new()
            .with_max_iterations(1)
            .solve(&mut model)
            .unwrap();

        assert_eq!(results.termination, TerminationCondition::MaxIterations);
        assert_eq!(results.iterations, 1);
        assert!(!results.converged());
    }

    #[test]
    fn failed_line_search_restores_values() {
        let mut model = Model::new();
        let x = model.add_var("x", 0.0);
        let root = model.root();
        // Satisfied at the start and violated by any step towards the target
        model
            .add_constraint(root, "steep", &[], |_| {
                Some(ConstraintData::bounded(
                    f64::NEG_INFINITY,
                    1000.0 * Expression::var(x),
                    0.0,
                ))
            })
            .unwrap();
        model
            .add_constraint(root, "target", &[], |_| Some(ConstraintData::equality(x, 1.0)))
            .unwrap();

        let results = NewtonSolver::new().solve(&mut model).unwrap();

        assert_eq!(results.termination, TerminationCondition::Singular);
        assert_eq!(results.iterations, 1);
        assert_eq!(model.variables().value(x), 0.0);
        assert!(is_close!(results.max_residual, 1.0));
        assert_eq!(
            results.message.as_deref(),
            Some("Could not find a descent step")
        );
    }
}
