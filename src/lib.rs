//! # Append-only planning tree for LQR-RT*
//!
//! This library implements the node store at the heart of a sampling-based
//! kinodynamic planner. Every node is a reachable state of the controlled
//! system; every edge carries the feedback gain and the state/control
//! segments (computed by an external LQR solver) that steer the parent
//! state to the child state.
//!
//! ## Core Operations
//!
//! 1. **Growth**: [`Tree::add_node`] appends a child of an existing node in O(1) amortized
//! 2. **Climb**: [`Tree::climb`] walks parent links back to the root
//! 3. **Reconstruction**: [`Tree::trajectory`] gathers the stored segments for an id chain
//!
//! Node ids are plain indices into arena storage. A parent always has a
//! smaller id than its children, so every ancestor chain is finite.
//!
//! ## Usage Example
//!
//! ```
//! use lqrrt_tree::{LqrEdge, Tree};
//! use nalgebra::DMatrix;
//!
//! let gain = DMatrix::<f64>::zeros(1, 2);
//! let mut tree = Tree::<LqrEdge>::new(vec![0.0, 0.0], gain.clone())?;
//!
//! let x_seq = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 1.0, 0.0]);
//! let u_seq = DMatrix::from_row_slice(1, 1, &[0.5]);
//! let child = tree.add_node(tree.root(), vec![1.0, 0.0], gain, x_seq, u_seq)?;
//!
//! let chain = tree.climb(child)?;
//! assert_eq!(chain, vec![child, tree.root()]);
//! let segments = tree.trajectory(&chain)?;
//! assert_eq!(segments.len(), 2);
//! # Ok::<(), lqrrt_tree::TreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod payload; // Opaque edge data and the LQR matrix payload
pub mod tree; // Node arena, climb, trajectory reconstruction

// Re-exports for convenience
pub use payload::{EdgePayload, InconsistentSeedControl, LqrEdge};
pub use tree::{Climb, NodeId, NodeRef, Trajectory, Tree};

use thiserror::Error;

/// Configuration parameters for tree construction
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Number of nodes to reserve up front (a hint: oversized values are logged and skipped)
    pub capacity: usize,

    /// Control dimensionality the seed gain must encode (`None` derives it from the gain)
    pub expected_controls: Option<usize>,

    /// Fail construction instead of degrading when the seed gain is inconsistent
    pub strict_seed_control: bool,
}

impl TreeConfig {
    /// Reserve storage for `capacity` nodes (root included).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Require the seed gain to encode exactly `ncontrols` control inputs.
    pub fn with_expected_controls(mut self, ncontrols: usize) -> Self {
        self.expected_controls = Some(ncontrols);
        self
    }

    /// Enable strict seed checking.
    pub fn with_strict_seed_control(mut self, enabled: bool) -> Self {
        self.strict_seed_control = enabled;
        self
    }
}

/// Errors reported by tree operations
///
/// Every variant is recoverable: a rejected call leaves the tree untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// `add_node` was given a parent outside `[0, size)`
    #[error("parent id {parent} does not exist (tree size {size})")]
    InvalidParent {
        /// Parent index that was requested
        parent: i64,
        /// Node count at the time of the call
        size: usize,
    },

    /// A query referenced a node outside `[0, size)`
    #[error("node id {id} does not exist (tree size {size})")]
    InvalidId {
        /// Node index that was requested
        id: i64,
        /// Node count at the time of the call
        size: usize,
    },

    /// A state vector does not match the tree's dimensionality
    #[error("state has {actual} components, tree expects {expected}")]
    StateDimension {
        /// `nstates` fixed at construction
        expected: usize,
        /// Length of the rejected state
        actual: usize,
    },

    /// The seed state is empty, so `nstates` cannot be established
    #[error("seed state must have at least one component")]
    EmptySeedState,

    /// Requested capacity cannot be represented or allocated
    #[error("cannot reserve room for {nodes} more nodes")]
    CapacityOverflow {
        /// Node count that was requested
        nodes: usize,
    },

    /// Seed gain rejected under [`TreeConfig::strict_seed_control`]
    #[error("seed control rejected: {0}")]
    InconsistentSeedControl(#[from] InconsistentSeedControl),
}
