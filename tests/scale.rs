//! Volume test: ten thousand sequential insertions

mod common;

use common::*;
use lqrrt_tree::{LqrEdge, NodeId, Tree, TreeConfig};
use nalgebra::DMatrix;

const NODES: usize = 10_000;

fn grow(branching: usize) -> Tree<LqrEdge> {
    let config = TreeConfig::default().with_capacity(NODES + 1);
    let mut tree = Tree::with_config([0.0; 4], DMatrix::zeros(1, 4), config).expect("seed");
    for i in 1..=NODES {
        let parent = NodeId::from((i - 1) / branching);
        let x_seq = segment(1, 4, i as f64);
        tree.add_node(parent, [i as f64; 4], segment(1, 4, 0.0), x_seq, segment(1, 1, 0.0))
            .expect("parent exists");
    }
    tree
}

#[test]
fn test_ten_thousand_nodes_binary() {
    let tree = grow(2);
    assert_eq!(tree.size(), NODES + 1);

    let mut depths = vec![0usize; tree.size()];
    for node in tree.nodes().skip(1) {
        let parent = node.parent.expect("non-root");
        depths[node.id.index()] = depths[parent.index()] + 1;
    }

    for node in tree.nodes() {
        let chain = tree.climb(node.id).expect("node exists");
        assert!(chain.len() <= depths[node.id.index()] + 1);
        assert_eq!(chain.last(), Some(&NodeId::ROOT));
    }

    // heap-shaped tree: depth grows logarithmically
    let deepest = tree.depth(NodeId::from(NODES)).expect("exists");
    assert_eq!(deepest, 13);
}

#[test]
fn test_ten_thousand_nodes_single_chain() {
    let tree = grow(1);
    let leaf = NodeId::from(NODES);

    let chain = tree.climb(leaf).expect("leaf exists");
    assert_eq!(chain.len(), NODES + 1);
    assert!(chain.iter().rev().enumerate().all(|(i, id)| id.index() == i));

    let playback = tree.playback(leaf).expect("leaf exists");
    assert_eq!(playback.len(), NODES + 1);
    assert_eq!(playback.states[NODES][(0, 0)], NODES as f64);
}
