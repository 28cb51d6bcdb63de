//! Tooling for the initial conditions of discretized differential-algebraic models.
//!
//! Models are hierarchies of blocks and constraints indexed by ordered sets. Given a
//! distinguished set such as time, this crate can
//!
//! - deactivate every component at selected points of the set ([`deactivate_model_at`])
//! - find the constraints that are violated at the initial point
//!   ([`get_inconsistent_initial_conditions`])
//! - solve for consistent initial conditions with the rest of the model switched off
//!   ([`solve_consistent_initial_conditions`])

pub use daeinit_core::*;
pub use daeinit_solvers as solvers;
pub use daeinit_solvers::NewtonSolver;
