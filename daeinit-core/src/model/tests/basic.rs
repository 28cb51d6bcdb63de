//! Basic model tests: construction, names, dot, serialisation.

use crate::errors::InitCondError;
use crate::example_models::ExampleModel;
use crate::index;
use crate::model::{ComponentKind, ConstraintData, DataKind, Model};
use crate::sets::OrderedSet;
use crate::walker::{active_constraint_data, ComponentWalker};
use crate::{get_inconsistent_initial_conditions, CheckOptions};
use is_close::is_close;

#[test]
fn empty_model() {
    let model = Model::new();
    let root = model.root();

    assert!(model.is_active(root));
    assert!(model.children(root).is_empty());
    assert_eq!(model.component_of(root).unwrap(), model.root_component());
    assert_eq!(model.data(root).unwrap().kind, DataKind::Block);
}

#[test]
fn construction() {
    let ex = ExampleModel::build();
    let m = &ex.model;

    let fs = m.component(ex.fs).unwrap();
    assert_eq!(fs.kind, ComponentKind::Block);
    assert!(!fs.is_indexed());

    let b2 = m.component(ex.fs_b2).unwrap();
    assert_eq!(b2.index_sets, vec![ex.time, ex.space]);
    assert_eq!(b2.data.len(), 33);

    // Dense constraints have every index, the discretization equation skips t0
    assert_eq!(m.data_of(ex.b1_con).len(), 33);
    assert_eq!(m.data_of(ex.dv_disc_eq).len(), 30);
    assert!(m.lookup(ex.dv_disc_eq, &index![0.0, "a"]).is_none());
    assert!(m.lookup(ex.dv_disc_eq, &index![1.0, "a"]).is_some());
}

#[test]
fn names() {
    let ex = ExampleModel::build();
    let m = &ex.model;

    assert_eq!(m.component_name(ex.fs_b2), "fs.b2");
    assert_eq!(m.data_name(ex.at(ex.con1, index![2.0])), "fs.con1[2]");
    assert_eq!(
        m.data_name(ex.b3_con(index![0.0, "a"], "d", "g")),
        "fs.b2[0, a].b3[d].con[g]"
    );
    assert_eq!(m.data_name(m.scalar_data(ex.fs).unwrap()), "fs");
}

#[test]
fn parents_and_children() {
    let ex = ExampleModel::build();
    let m = &ex.model;
    let fs_data = m.scalar_data(ex.fs).unwrap();

    assert_eq!(m.children(fs_data), vec![ex.b1, ex.fs_b2, ex.con1, ex.con2]);
    assert_eq!(m.parent_block(ex.con1), Some(fs_data));
    assert_eq!(m.parent_block(ex.fs), Some(m.root()));
    assert_eq!(m.parent_block(m.root_component()), None);
}

#[test]
fn evaluate_constraints() {
    let ex = ExampleModel::build();
    let m = &ex.model;

    // dv - (7 - v) = 0 - 6
    let con = m.constraint(ex.at(ex.b1_con, index![0.0, "a"])).unwrap();
    assert!(is_close!(m.evaluate(&con.body), -6.0));
    assert!(is_close!(con.violation(m.variables()), 6.0));

    // Blocks have no constraint body
    assert!(m.constraint(ex.at(ex.fs_b2, index![0.0, "a"])).is_none());
}

#[test]
fn constraint_on_constraint_data_is_rejected() {
    let mut ex = ExampleModel::build();
    let con1_0 = ex.at(ex.con1, index![0.0]);
    let err = ex
        .model
        .add_constraint(con1_0, "bad", &[], |_| Some(ConstraintData::bounded(0.0, 0.0, 0.0)))
        .unwrap_err();
    assert!(matches!(err, InitCondError::Error(_)));
}

#[test]
fn reference_is_walked_once() {
    let mut model = Model::new();
    let time = model.add_set(OrderedSet::continuous("time", [0.0, 1.0]));
    let x = model.add_var("x", 0.0);
    let root = model.root();

    let owner = model.add_block(root, "owner", &[]).unwrap();
    let owner_data = model.scalar_data(owner).unwrap();
    let con = model
        .add_constraint(owner_data, "con", &[time], |_| {
            Some(ConstraintData::equality(x, 1.0))
        })
        .unwrap();
    let alias = model.add_block(root, "alias", &[]).unwrap();
    let alias_data = model.scalar_data(alias).unwrap();
    model.add_reference(alias_data, con).unwrap();

    assert_eq!(model.children(alias_data), vec![con]);
    // The owner decides the name
    assert_eq!(model.component_name(con), "owner.con");

    let found: Vec<_> = ComponentWalker::all(&model, root)
        .filter(|c| *c == con)
        .collect();
    assert_eq!(found.len(), 1);
    assert_eq!(active_constraint_data(&model, root).count(), 2);
}

#[test]
fn reference_requires_block_data() {
    let mut ex = ExampleModel::build();
    let con1_0 = ex.at(ex.con1, index![0.0]);
    assert!(ex.model.add_reference(con1_0, ex.con2).is_err());
}

#[test]
fn dot() {
    let mut model = Model::new();
    let root = model.root();
    model
        .add_constraint(root, "con", &[], |_| {
            Some(ConstraintData::bounded(0.0, 0.0, 1.0))
        })
        .unwrap();

    let res = model.as_dot();
    assert!(res.starts_with("digraph {"));
    assert!(res.contains("Constraint con"));
    assert_eq!(res.matches("->").count(), 3);
}

#[test]
fn serialise_and_deserialise_model() {
    let ex = ExampleModel::build();

    let serialised = serde_json::to_string(&ex.model).unwrap();
    let deserialised: Model = serde_json::from_str(&serialised).unwrap();

    assert_eq!(
        deserialised.data_name(ex.b3_con(index![3.0, "b"], "e", "h")),
        "fs.b2[3, b].b3[e].con[h]"
    );
    assert_eq!(deserialised.data_of(ex.dv_disc_eq).len(), 30);

    let check = |m: &Model| {
        get_inconsistent_initial_conditions(m, m.root(), ex.time, &CheckOptions::default())
            .unwrap()
    };
    assert_eq!(check(&deserialised), check(&ex.model));
}
