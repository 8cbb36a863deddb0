//! Dense-matrix payload for LQR edges
//!
//! Gains are `ncontrols x nstates`; state and control segments hold one
//! time sample per row.

use nalgebra::DMatrix;

use super::{EdgePayload, InconsistentSeedControl};
use crate::tree::Tree;

/// Edge payload produced by an LQR steering function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LqrEdge;

impl EdgePayload for LqrEdge {
    type Gain = DMatrix<f64>;
    type StateSeq = DMatrix<f64>;
    type ControlSeq = DMatrix<f64>;

    fn seed_controls(
        gain: &DMatrix<f64>,
        nstates: usize,
    ) -> Result<usize, InconsistentSeedControl> {
        if gain.nrows() == 0 || gain.ncols() != nstates {
            return Err(InconsistentSeedControl::Shape {
                rows: gain.nrows(),
                cols: gain.ncols(),
                nstates,
            });
        }
        Ok(gain.nrows())
    }

    /// A single zeroed `1 x nstates` sample.
    fn root_state_seq(nstates: usize) -> DMatrix<f64> {
        DMatrix::zeros(1, nstates)
    }

    fn root_control_seq(ncontrols: usize) -> DMatrix<f64> {
        DMatrix::zeros(1, ncontrols)
    }
}

/// All node states stacked as a `size x nstates` matrix, one row per node id.
pub fn state_matrix<P: EdgePayload>(tree: &Tree<P>) -> DMatrix<f64> {
    DMatrix::from_row_slice(tree.size(), tree.nstates(), tree.states())
}
