//! Reference models used throughout the tests.
//!
//! [`ExampleModel`] is a small model with the shapes that make traversal by time
//! interesting: a time-indexed block inside a scalar block, a block indexed by time and
//! space that contains blocks indexed by a plain set, and backward-difference
//! discretization equations that skip the first time point.

#![allow(dead_code)]

use crate::errors::{InitCondError, InitCondResult};
use crate::expression::Expression;
use crate::index::{Index, IndexValue};
use crate::model::{ComponentId, ConstraintData, DataId, Model};
use crate::sets::{DiscretizationScheme, OrderedSet, SetId};
use crate::variable::VarId;
use indexmap::IndexMap;

/// Handles into the model built by [`ExampleModel::build`]
///
/// ```text
/// time  = {0, 1, ..., 10}   (backward difference)
/// space = {a, b, c}
///
/// fs.v0[x]                                     = 1
/// fs.b1.v[t, x]                                = 1
/// fs.b1.dv[t, x]                               = 0
/// fs.b1.con[t, x]:         dv[t, x] == 7 - v[t, x]                  (inconsistent)
/// fs.b1.dv_disc_eq[t, x]:  dv[t, x] == (v[t, x] - v[t-1, x]) / h   (skips t0)
/// fs.b1.b2[t]              block with a single variable
/// fs.b2[t, x].v[c]                             = 2
/// fs.b2[t, x].b3[c].v[s]                       = 3
/// fs.b2[t, x].b3[c].con[s]: 5 v[s] == fs.b2[t0, a].v[c]            (inconsistent)
/// fs.con1[t]:              fs.b1.v[t, c] == 5                       (inconsistent)
/// fs.con2[x]:              fs.b1.v[t0, x] == fs.v0[x]               (consistent)
/// ```
pub struct ExampleModel {
    pub model: Model,
    pub time: SetId,
    pub space: SetId,
    pub set1: SetId,
    pub set2: SetId,
    pub fs: ComponentId,
    pub b1: ComponentId,
    pub b1_con: ComponentId,
    pub dv_disc_eq: ComponentId,
    pub b1_b2: ComponentId,
    pub fs_b2: ComponentId,
    pub con1: ComponentId,
    pub con2: ComponentId,
    pub v0: IndexMap<Index, VarId>,
    pub v: IndexMap<Index, VarId>,
    pub dv: IndexMap<Index, VarId>,
    /// `fs.b2[t0, a].v`, referenced by every `b3.con`
    pub reference_v: IndexMap<Index, VarId>,
}

impl ExampleModel {
    pub fn build() -> Self {
        Self::build_with_scheme(DiscretizationScheme::BackwardDifference)
    }

    /// Build the model, tagging time with a different discretization scheme
    pub fn build_with_scheme(scheme: DiscretizationScheme) -> Self {
        Self::try_build(scheme).expect("example model is well formed")
    }

    fn try_build(scheme: DiscretizationScheme) -> InitCondResult<Self> {
        let mut model = Model::new();
        let time = model.add_set(
            OrderedSet::continuous("time", (0..=10).map(|t| t as f64)).with_discretization(scheme),
        );
        let space = model.add_set(OrderedSet::new("space", ["a", "b", "c"]));
        let set1 = model.add_set(OrderedSet::new("set1", ["d", "e", "f"]));
        let set2 = model.add_set(OrderedSet::new("set2", ["g", "h", "i"]));

        let empty = || InitCondError::Error("empty set in example model".to_string());
        let t0 = model.set(time).first().cloned().ok_or_else(empty)?;
        let x_last = model.set(space).last().cloned().ok_or_else(empty)?;
        let x_first = model.set(space).first().cloned().ok_or_else(empty)?;

        let root = model.root();
        let fs = model.add_block(root, "fs", &[])?;
        let fs_data = model.scalar_data(fs).ok_or_else(empty)?;
        let v0 = model.add_indexed_var("fs.v0", &[space], 1.0);

        // fs.b1
        let b1 = model.add_block(fs_data, "b1", &[])?;
        let b1_data = model.scalar_data(b1).ok_or_else(empty)?;
        let v = model.add_indexed_var("fs.b1.v", &[time, space], 1.0);
        let dv = model.add_indexed_var("fs.b1.dv", &[time, space], 0.0);

        let b1_con = model.add_constraint(b1_data, "con", &[time, space], |idx| {
            Some(ConstraintData::equality(dv[idx], 7.0 - Expression::var(v[idx])))
        })?;

        let time_set = model.set(time).clone();
        let dv_disc_eq = model.add_constraint(b1_data, "dv_disc_eq", &[time, space], |idx| {
            let t = idx.get(0)?;
            let prev = time_set.prev(t)?;
            let h = t.as_f64()? - prev.as_f64()?;
            let prev_idx = Index::new(vec![prev.clone(), idx.get(1)?.clone()]);
            Some(ConstraintData::equality(
                dv[idx],
                (Expression::var(v[idx]) - Expression::var(v[&prev_idx])) / h,
            ))
        })?;

        let b1_b2 = model.add_block(b1_data, "b2", &[time])?;
        for (_, data) in model.data_of(b1_b2) {
            let name = format!("{}.v", model.data_name(data));
            model.add_var(&name, 2.0);
        }

        // fs.b2[t, x]
        let fs_b2 = model.add_block(fs_data, "b2", &[time, space])?;
        let b2_data = model.data_of(fs_b2);
        let mut b2_v: IndexMap<Index, IndexMap<Index, VarId>> = IndexMap::new();
        for (index, data) in b2_data.iter() {
            let name = format!("{}.v", model.data_name(*data));
            let vars = model.add_indexed_var(&name, &[set1], 2.0);
            b2_v.insert(index.clone(), vars);
        }
        let reference_v = b2_v[&Index::new(vec![t0.clone(), x_first.clone()])].clone();

        for (_, data) in b2_data {
            let b3 = model.add_block(data, "b3", &[set1])?;
            for (c, b3_data) in model.data_of(b3) {
                let name = format!("{}.v", model.data_name(b3_data));
                let b3_v = model.add_indexed_var(&name, &[set2], 3.0);
                let rhs = reference_v[&c];
                model.add_constraint(b3_data, "con", &[set2], |s| {
                    Some(ConstraintData::equality(
                        5.0 * Expression::var(b3_v[s]),
                        Expression::var(rhs),
                    ))
                })?;
            }
        }

        let con1 = model.add_constraint(fs_data, "con1", &[time], |idx| {
            let t = idx.get(0)?.clone();
            Some(ConstraintData::equality(
                v[&Index::new(vec![t, x_last.clone()])],
                5.0,
            ))
        })?;

        let con2 = model.add_constraint(fs_data, "con2", &[space], |idx| {
            let x = idx.get(0)?.clone();
            Some(ConstraintData::equality(
                v[&Index::new(vec![t0.clone(), x])],
                Expression::var(v0[idx]),
            ))
        })?;

        Ok(Self {
            model,
            time,
            space,
            set1,
            set2,
            fs,
            b1,
            b1_con,
            dv_disc_eq,
            b1_b2,
            fs_b2,
            con1,
            con2,
            v0,
            v,
            dv,
            reference_v,
        })
    }

    /// Point of time at a zero-based position
    pub fn t(&self, position: usize) -> IndexValue {
        self.model
            .set(self.time)
            .nth(position)
            .cloned()
            .expect("position within time")
    }

    /// The data of a component at `index`
    pub fn at(&self, component: ComponentId, index: Index) -> DataId {
        self.model
            .lookup(component, &index)
            .unwrap_or_else(|| {
                panic!(
                    "{} has no index {}",
                    self.model.component_name(component),
                    index
                )
            })
    }

    /// The data of `fs.b2[index].b3[c].con[s]`
    pub fn b3_con(&self, b2_index: Index, c: &str, s: &str) -> DataId {
        let b2_data = self.at(self.fs_b2, b2_index);
        let b3 = self.model.children(b2_data)[0];
        let b3_data = self.at(b3, Index::from(IndexValue::from(c)));
        let con = self.model.children(b3_data)[0];
        self.at(con, Index::from(IndexValue::from(s)))
    }
}
