//! Edge payloads
//!
//! The tree stores a gain, a state sequence and a control sequence for the
//! edge into every node. It never looks inside them: the only place the
//! payload type is consulted is construction, where the root needs
//! placeholder segments and the seed gain is sanity-checked.

mod lqr;

pub use lqr::{state_matrix, LqrEdge};

use thiserror::Error;

/// Capability describing the opaque per-edge data a tree carries.
///
/// Implementors pick the concrete gain and segment types produced by their
/// controller (LQR, or any other feedback law).
pub trait EdgePayload {
    /// Feedback artifact for an edge (e.g. an LQR gain matrix).
    type Gain;
    /// Time-sampled states along an edge.
    type StateSeq;
    /// Time-sampled controls along an edge.
    type ControlSeq;

    /// Number of control inputs encoded by the seed gain of an `nstates`-dimensional system.
    fn seed_controls(gain: &Self::Gain, nstates: usize) -> Result<usize, InconsistentSeedControl>;

    /// Zero-length or zero-valued state sequence stored on the root, which
    /// has no incoming edge.
    fn root_state_seq(nstates: usize) -> Self::StateSeq;

    /// Control sequence stored on the root (`ncontrols == 0` after a rejected seed gain).
    fn root_control_seq(ncontrols: usize) -> Self::ControlSeq;
}

/// Seed gain does not match the expected control shape.
///
/// Reported at construction; the tree keeps going with an empty root control feature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InconsistentSeedControl {
    /// Gain columns do not line up with the state dimension
    #[error("seed gain is {rows}x{cols}, expected {nstates} columns")]
    Shape {
        /// Gain rows
        rows: usize,
        /// Gain columns
        cols: usize,
        /// Tree state dimension
        nstates: usize,
    },

    /// Gain encodes a different number of controls than configured
    #[error("seed gain encodes {actual} controls, expected {expected}")]
    ControlCount {
        /// Configured control dimension
        expected: usize,
        /// Control dimension found in the gain
        actual: usize,
    },
}
