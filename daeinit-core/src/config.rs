//! Options loaded from TOML.
//!
//! ```toml
//! tolerance = 1e-6
//! allow_skip = true
//! suppress_warnings = false
//!
//! [solver]
//! type = "NewtonSolver"
//! max_iterations = 20
//! ```

use crate::consistency::CheckOptions;
use crate::deactivate::SkipPolicy;
use crate::errors::InitCondResult;
use crate::solver::Solver;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InitCondConfig {
    /// Maximum allowed constraint violation when checking consistency
    pub tolerance: f64,
    pub allow_skip: bool,
    pub suppress_warnings: bool,
    /// Solver used for consistent initial conditions, selected by type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<Box<dyn Solver>>,
}

impl Default for InitCondConfig {
    fn default() -> Self {
        let policy = SkipPolicy::default();
        Self {
            tolerance: CheckOptions::default().tolerance,
            allow_skip: policy.allow_skip,
            suppress_warnings: policy.suppress_warnings,
            solver: None,
        }
    }
}

impl InitCondConfig {
    pub fn from_toml_str(content: &str) -> InitCondResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> InitCondResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn skip_policy(&self) -> SkipPolicy {
        SkipPolicy {
            allow_skip: self.allow_skip,
            suppress_warnings: self.suppress_warnings,
        }
    }

    /// Options for checking consistency at the first point of a set
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            tolerance: self.tolerance,
            t0: None,
            policy: self.skip_policy(),
        }
    }
}
