//! Seed control handling at construction

mod common;

use common::*;
use lqrrt_tree::{InconsistentSeedControl, LqrEdge, NodeId, Tree, TreeConfig, TreeError};
use nalgebra::DMatrix;

#[test]
fn test_inconsistent_seed_gain_is_not_fatal() {
    let tree =
        Tree::<LqrEdge>::new([1.0, 2.0], DMatrix::zeros(3, 5)).expect("construction proceeds");

    assert_eq!(tree.size(), 1);
    assert_eq!(tree.nstates(), 2);
    assert_eq!(tree.ncontrols(), 0);
    assert!(matches!(
        tree.seed_control_issue(),
        Some(InconsistentSeedControl::Shape { rows: 3, cols: 5, nstates: 2 })
    ));
    assert_eq!(tree.u_seq(NodeId::ROOT).map(|u| u.ncols()), Some(0));
    assert_eq!(tree.state(NodeId::ROOT), Some(&[1.0, 2.0][..]));
}

#[test]
fn test_degraded_tree_still_grows() {
    let mut tree =
        Tree::<LqrEdge>::new([0.0, 0.0], DMatrix::zeros(0, 0)).expect("construction proceeds");
    assert!(tree.seed_control_issue().is_some());

    let id = add_lqr(&mut tree, NodeId::ROOT, &[1.0, 1.0]);
    assert_eq!(tree.climb(id), Ok(vec![id, NodeId::ROOT]));
}

#[test]
fn test_tagged_payload_reports_empty_gain() {
    let tree = Tree::<Tagged>::new([0.0], "").expect("construction proceeds");
    assert!(tree.seed_control_issue().is_some());
    assert_eq!(tree.u_seq(NodeId::ROOT).map(String::as_str), Some("u_root"));
}

#[test]
fn test_expected_controls_mismatch() {
    let config = TreeConfig::default().with_expected_controls(2);
    let tree = Tree::<LqrEdge>::with_config([0.0, 0.0], DMatrix::zeros(1, 2), config.clone())
        .expect("lenient by default");
    assert_eq!(
        tree.seed_control_issue(),
        Some(&InconsistentSeedControl::ControlCount {
            expected: 2,
            actual: 1
        })
    );

    let strict = config.with_strict_seed_control(true);
    let result = Tree::<LqrEdge>::with_config([0.0, 0.0], DMatrix::zeros(1, 2), strict);
    assert!(matches!(result, Err(TreeError::InconsistentSeedControl(_))));
}

#[test]
fn test_consistent_seed_gain() {
    let config = TreeConfig::default().with_expected_controls(2);
    let tree = Tree::<LqrEdge>::with_config([0.0, 0.0, 0.0], DMatrix::zeros(2, 3), config)
        .expect("consistent");
    assert!(tree.seed_control_issue().is_none());
    assert_eq!(tree.ncontrols(), 2);
    assert_eq!(tree.u_seq(NodeId::ROOT).map(|u| u.shape()), Some((1, 2)));
}

#[test]
fn test_root_segments_are_zeroed_for_nonzero_seed() {
    let tree = Tree::<LqrEdge>::new([3.0, 4.0], DMatrix::zeros(1, 2)).expect("consistent");

    assert_eq!(tree.state(NodeId::ROOT), Some(&[3.0, 4.0][..]));
    let x_root = tree.x_seq(NodeId::ROOT).expect("root exists");
    assert!(x_root.is_empty() || x_root.iter().all(|&v| v == 0.0));
    let u_root = tree.u_seq(NodeId::ROOT).expect("root exists");
    assert!(u_root.iter().all(|&v| v == 0.0));
}
