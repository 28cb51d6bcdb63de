//! The solver collaborator.
//!
//! Solving is delegated to an external object implementing [`Solver`]. The results it
//! returns are passed back to the caller without interpretation.

use crate::errors::InitCondResult;
use crate::model::Model;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCondition {
    Converged,
    MaxIterations,
    /// The linearised system could not be solved
    Singular,
    Error,
}

/// Outcome reported by a solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResults {
    pub termination: TerminationCondition,
    pub iterations: usize,
    /// Largest absolute residual of the active constraints when the solver stopped
    pub max_residual: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SolverResults {
    pub fn converged(&self) -> bool {
        self.termination == TerminationCondition::Converged
    }
}

/// Something that can solve the active part of a model in place.
///
/// Implementations are registered with typetag so that a solver can be selected by name
/// in configuration files.
#[typetag::serde(tag = "type")]
pub trait Solver: Debug {
    fn solve(&self, model: &mut Model) -> InitCondResult<SolverResults>;
}
