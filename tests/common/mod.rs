//! Shared fixtures for integration tests

#![allow(dead_code)]

use lqrrt_tree::{EdgePayload, InconsistentSeedControl, LqrEdge, NodeId, Tree};
use nalgebra::DMatrix;

/// Payload of plain labels, so tests can tell segments apart at a glance
#[derive(Debug)]
pub struct Tagged;

impl EdgePayload for Tagged {
    type Gain = &'static str;
    type StateSeq = String;
    type ControlSeq = String;

    fn seed_controls(
        gain: &&'static str,
        nstates: usize,
    ) -> Result<usize, InconsistentSeedControl> {
        if gain.is_empty() {
            return Err(InconsistentSeedControl::Shape {
                rows: 0,
                cols: 0,
                nstates,
            });
        }
        Ok(1)
    }

    fn root_state_seq(_nstates: usize) -> String {
        "x_root".to_string()
    }

    fn root_control_seq(_ncontrols: usize) -> String {
        "u_root".to_string()
    }
}

/// Seed a two-dimensional labelled tree at the origin
pub fn tagged_tree() -> Tree<Tagged> {
    Tree::new([0.0, 0.0], "gain_root").expect("seed is consistent")
}

/// Append a labelled node whose segments are `x<tag>` / `u<tag>`
pub fn add_tagged(tree: &mut Tree<Tagged>, parent: NodeId, state: [f64; 2], tag: &str) -> NodeId {
    tree.add_node(parent, state, "gain", format!("x{tag}"), format!("u{tag}"))
        .expect("parent exists")
}

/// Seed an LQR tree with one control input
pub fn lqr_tree(nstates: usize) -> Tree<LqrEdge> {
    Tree::new(vec![0.0; nstates], DMatrix::zeros(1, nstates)).expect("seed is consistent")
}

/// Constant-valued segment with `samples` rows
pub fn segment(samples: usize, width: usize, value: f64) -> DMatrix<f64> {
    DMatrix::from_element(samples, width, value)
}

/// Append an LQR node with one-sample placeholder segments
pub fn add_lqr(tree: &mut Tree<LqrEdge>, parent: NodeId, state: &[f64]) -> NodeId {
    let n = tree.nstates();
    tree.add_node(parent, state, segment(1, n, 0.0), segment(1, n, 0.0), segment(1, 1, 0.0))
        .expect("parent exists")
}
