//! Model variables.
//!
//! Variables are not part of the component hierarchy that is walked when deactivating
//! or checking a model. They are stored flat and referenced from expressions by [`VarId`].

use serde::{Deserialize, Serialize};

/// Handle to a variable owned by a [`VariableStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: f64,
    /// Fixed variables are treated as parameters by solvers
    pub fixed: bool,
}

/// Storage for the current values of all variables in a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableStore {
    variables: Vec<Variable>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, value: f64) -> VarId {
        self.variables.push(Variable {
            name: name.to_string(),
            value,
            fixed: false,
        });
        VarId(self.variables.len() - 1)
    }

    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    /// Current value of a variable
    ///
    /// # Panics
    ///
    /// Panics if the id was not created by this store.
    pub fn value(&self, id: VarId) -> f64 {
        self.variables[id.0].value
    }

    pub fn set_value(&mut self, id: VarId, value: f64) {
        self.variables[id.0].value = value;
    }

    pub fn fix(&mut self, id: VarId) {
        self.variables[id.0].fixed = true;
    }

    pub fn unfix(&mut self, id: VarId) {
        self.variables[id.0].fixed = false;
    }

    pub fn is_fixed(&self, id: VarId) -> bool {
        self.variables[id.0].fixed
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, variable)| (VarId(i), variable))
    }
}
