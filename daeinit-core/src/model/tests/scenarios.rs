//! Deactivating and checking the reference model by time.

use crate::classify::{is_explicitly_indexed_by, is_in_block_indexed_by};
use crate::deactivate::{deactivate_model_at, reactivate, SkipPolicy};
use crate::example_models::ExampleModel;
use crate::index;
use crate::index::{Index, IndexValue};
use crate::model::{ComponentKind, DataId, Model};
use crate::walker::{direct_targets, ComponentWalker};
use crate::{get_inconsistent_initial_conditions, CheckOptions};
use std::collections::HashSet;

/// Every constraint and block data in the model with its activation flag
fn activation_state(model: &Model) -> Vec<(DataId, bool)> {
    let mut state = vec![];
    for component in ComponentWalker::all(model, model.root()) {
        for (_, data) in model.data_of(component) {
            state.push((data, model.is_active(data)));
        }
    }
    state
}

#[test]
fn deactivate_single_point() {
    let mut ex = ExampleModel::build();
    let root = ex.model.root();
    let t2 = ex.t(2);
    deactivate_model_at(&mut ex.model, root, ex.time, &[t2], SkipPolicy::default()).unwrap();

    assert!(!ex.model.is_active(ex.at(ex.con1, index![2.0])));
    assert!(ex.model.is_active(ex.at(ex.con1, index![1.0])));
    assert!(ex.model.is_active(ex.at(ex.con1, index![3.0])));

    for x in ["a", "b", "c"] {
        assert!(!ex.model.is_active(ex.at(ex.b1_con, index![2.0, x])));
        assert!(!ex.model.is_active(ex.at(ex.dv_disc_eq, index![2.0, x])));
        assert!(!ex.model.is_active(ex.at(ex.fs_b2, index![2.0, x])));
    }
    assert!(!ex.model.is_active(ex.at(ex.b1_b2, index![2.0])));
    // Not indexed by time
    assert!(ex.model.is_active(ex.at(ex.con2, index!["a"])));
}

#[test]
fn implicitly_indexed_contents_are_not_touched() {
    let mut ex = ExampleModel::build();
    let root = ex.model.root();
    let inner = ex.b3_con(index![2.0, "a"], "d", "g");
    let t2 = ex.t(2);
    deactivate_model_at(&mut ex.model, root, ex.time, &[t2], SkipPolicy::default()).unwrap();

    // The containing block data is switched off instead
    assert!(ex.model.is_active(inner));
    assert!(!ex.model.is_active(ex.at(ex.fs_b2, index![2.0, "a"])));
}

#[test]
fn eligible_components_are_never_nested_in_time() {
    let ex = ExampleModel::build();
    let m = &ex.model;
    let kinds = [ComponentKind::Block, ComponentKind::Constraint];

    let targets: HashSet<_> = direct_targets(m, m.root(), ex.time, &kinds).collect();
    for component in ComponentWalker::all(m, m.root()) {
        let eligible = is_explicitly_indexed_by(m, component, ex.time)
            && !is_in_block_indexed_by(m, component, ex.time);
        assert_eq!(targets.contains(&component), eligible);
        if is_in_block_indexed_by(m, component, ex.time) {
            assert!(!targets.contains(&component));
        }
    }
    assert_eq!(targets.len(), 5);
}

#[test]
fn deactivating_twice_is_idempotent() {
    let mut once = ExampleModel::build();
    let mut twice = ExampleModel::build();
    let points: Vec<IndexValue> = vec![once.t(1), once.t(4)];

    let root = once.model.root();
    deactivate_model_at(&mut once.model, root, once.time, &points, SkipPolicy::default()).unwrap();
    let root = twice.model.root();
    for _ in 0..2 {
        deactivate_model_at(&mut twice.model, root, twice.time, &points, SkipPolicy::default())
            .unwrap();
    }

    assert_eq!(activation_state(&once.model), activation_state(&twice.model));
}

#[test]
fn deactivate_then_reactivate_restores_all() {
    let mut ex = ExampleModel::build();
    let before = activation_state(&ex.model);
    assert!(before.iter().all(|(_, active)| *active));

    let root = ex.model.root();
    let points: Vec<IndexValue> = ex.model.set(ex.time).iter().cloned().collect();
    let deactivated =
        deactivate_model_at(&mut ex.model, root, ex.time, &points, SkipPolicy::default()).unwrap();
    assert_ne!(activation_state(&ex.model), before);

    reactivate(&mut ex.model, &deactivated).unwrap();
    assert_eq!(activation_state(&ex.model), before);
}

#[test]
fn deactivate_from_inner_block() {
    let mut ex = ExampleModel::build();
    let b1_data = ex.model.scalar_data(ex.b1).unwrap();
    let t3 = ex.t(3);
    let deactivated = deactivate_model_at(
        &mut ex.model,
        b1_data,
        ex.time,
        &[t3.clone()],
        SkipPolicy::default(),
    )
    .unwrap();

    // b1.con (3), dv_disc_eq (3), b1.b2 (1)
    assert_eq!(deactivated[&t3].len(), 7);
    assert!(ex.model.is_active(ex.at(ex.con1, index![3.0])));
    assert!(ex.model.is_active(ex.at(ex.fs_b2, index![3.0, "a"])));
}

#[test]
fn consistent_after_fixing_values() {
    let mut ex = ExampleModel::build();
    let t0 = ex.t(0);
    {
        let vars = ex.model.variables_mut();
        for x in ["a", "b", "c"] {
            let idx = Index::new(vec![t0.clone(), IndexValue::from(x)]);
            // dv == 7 - v, and v[t0, c] == 5
            vars.set_value(ex.v[&idx], 5.0);
            vars.set_value(ex.dv[&idx], 2.0);
        }
    }
    // 5 * 3 == 15
    let b2_t0_a = ex.at(ex.fs_b2, index![0.0, "a"]);
    for id in ex.reference_v.values() {
        ex.model.variables_mut().set_value(*id, 15.0);
    }

    let m = &ex.model;
    let found =
        get_inconsistent_initial_conditions(m, m.root(), ex.time, &CheckOptions::default())
            .unwrap();
    assert!(
        found.is_empty(),
        "{:?}",
        found.iter().map(|d| m.data_name(*d)).collect::<Vec<_>>()
    );
    assert!(m.is_active(b2_t0_a));
}
