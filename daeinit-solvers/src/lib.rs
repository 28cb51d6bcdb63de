//! Solvers for finding consistent initial conditions of daeinit models.
//!
//! Solvers implement [`daeinit_core::solver::Solver`] and are registered with typetag, so
//! they can be selected by type name in an `InitCondConfig`.

mod newton;

pub use newton::NewtonSolver;
