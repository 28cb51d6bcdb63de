pub mod classify;
pub mod complement;
pub mod config;
pub mod consistency;
pub mod deactivate;
pub mod example_models;
pub mod expression;
pub mod index;
pub mod model;
pub mod sets;
pub mod solver;
pub mod transaction;
pub mod variable;
pub mod walker;

pub mod errors;

// Re-export the entry points for convenience
pub use consistency::{get_inconsistent_initial_conditions, CheckOptions};
pub use deactivate::{deactivate_model_at, reactivate, Deactivated, SkipPolicy};
pub use transaction::{solve_consistent_initial_conditions, ActivationGuard};
