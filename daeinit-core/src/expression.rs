//! Algebraic expressions over model variables.
//!
//! Expressions are built using the standard arithmetic operators:
//!
//! ```rust
//! use daeinit_core::expression::Expression;
//! use daeinit_core::variable::VariableStore;
//!
//! let mut store = VariableStore::new();
//! let v = store.add("v", 2.0);
//! let dv = store.add("dv", 0.0);
//!
//! // dv == 7 - v
//! let body = Expression::var(dv) - (7.0 - Expression::var(v));
//! assert_eq!(body.evaluate(&store), -5.0);
//! assert_eq!(body.partial_derivative(v, &store), 1.0);
//! ```

use crate::variable::{VarId, VariableStore};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Const(f64),
    Var(VarId),
    Add(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    Neg(Box<Expression>),
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Expression::Const(value)
    }

    pub fn var(id: VarId) -> Self {
        Expression::Var(id)
    }

    /// Evaluate the expression using the current variable values
    pub fn evaluate(&self, store: &VariableStore) -> f64 {
        self.evaluate_dual(store, None).0
    }

    /// Partial derivative of the expression with respect to `wrt` at the current values
    pub fn partial_derivative(&self, wrt: VarId, store: &VariableStore) -> f64 {
        self.evaluate_dual(store, Some(wrt)).1
    }

    /// Forward-mode evaluation returning `(value, d value / d wrt)`
    fn evaluate_dual(&self, store: &VariableStore, wrt: Option<VarId>) -> (f64, f64) {
        match self {
            Expression::Const(c) => (*c, 0.0),
            Expression::Var(id) => {
                let seed = if Some(*id) == wrt { 1.0 } else { 0.0 };
                (store.value(*id), seed)
            }
            Expression::Add(a, b) => {
                let (a, da) = a.evaluate_dual(store, wrt);
                let (b, db) = b.evaluate_dual(store, wrt);
                (a + b, da + db)
            }
            Expression::Sub(a, b) => {
                let (a, da) = a.evaluate_dual(store, wrt);
                let (b, db) = b.evaluate_dual(store, wrt);
                (a - b, da - db)
            }
            Expression::Mul(a, b) => {
                let (a, da) = a.evaluate_dual(store, wrt);
                let (b, db) = b.evaluate_dual(store, wrt);
                (a * b, da * b + a * db)
            }
            Expression::Div(a, b) => {
                let (a, da) = a.evaluate_dual(store, wrt);
                let (b, db) = b.evaluate_dual(store, wrt);
                (a / b, (da * b - a * db) / (b * b))
            }
            Expression::Neg(a) => {
                let (a, da) = a.evaluate_dual(store, wrt);
                (-a, -da)
            }
        }
    }

    /// Variables referenced by the expression, in order of first appearance
    pub fn variables(&self) -> IndexSet<VarId> {
        let mut found = IndexSet::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables(&self, found: &mut IndexSet<VarId>) {
        match self {
            Expression::Const(_) => {}
            Expression::Var(id) => {
                found.insert(*id);
            }
            Expression::Add(a, b)
            | Expression::Sub(a, b)
            | Expression::Mul(a, b)
            | Expression::Div(a, b) => {
                a.collect_variables(found);
                b.collect_variables(found);
            }
            Expression::Neg(a) => a.collect_variables(found),
        }
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Const(value)
    }
}

impl From<VarId> for Expression {
    fn from(id: VarId) -> Self {
        Expression::Var(id)
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl $trait<Expression> for Expression {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                Expression::$variant(Box::new(self), Box::new(rhs))
            }
        }

        impl $trait<f64> for Expression {
            type Output = Expression;

            fn $method(self, rhs: f64) -> Expression {
                Expression::$variant(Box::new(self), Box::new(Expression::Const(rhs)))
            }
        }

        impl $trait<Expression> for f64 {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                Expression::$variant(Box::new(Expression::Const(self)), Box::new(rhs))
            }
        }
    };
}

binary_op!(Add, add, Add);
binary_op!(Sub, sub, Sub);
binary_op!(Mul, mul, Mul);
binary_op!(Div, div, Div);

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression::Neg(Box::new(self))
    }
}
