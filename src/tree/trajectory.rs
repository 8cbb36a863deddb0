//! Trajectory reconstruction
//!
//! Gathers the stored edge segments for a sequence of node ids. Segments
//! are looked up by id value, so any id sequence works, not only a climb.
//! Stitching the segments into one continuous trajectory (overlap at the
//! joints, resampling) is left to the caller.

use std::fmt;

use super::{NodeId, Tree};
use crate::payload::EdgePayload;
use crate::TreeError;

/// Per-node edge segments, in the order of the requested ids
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[cfg_attr(
    feature = "visualize",
    serde(bound(serialize = "P::StateSeq: serde::Serialize, P::ControlSeq: serde::Serialize"))
)]
pub struct Trajectory<'a, P: EdgePayload> {
    /// State segment of each requested node
    pub states: Vec<&'a P::StateSeq>,
    /// Control segment of each requested node
    pub controls: Vec<&'a P::ControlSeq>,
}

impl<'a, P: EdgePayload> Trajectory<'a, P> {
    /// Number of segments
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True for an empty id sequence
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Same segments in the opposite order
    pub fn reversed(mut self) -> Self {
        self.states.reverse();
        self.controls.reverse();
        self
    }

    /// Iterate over `(x_seq, u_seq)` pairs
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a P::StateSeq, &'a P::ControlSeq)> + '_ {
        self.states
            .iter()
            .copied()
            .zip(self.controls.iter().copied())
    }

    /// Clone the segments out of the tree
    pub fn into_owned(self) -> (Vec<P::StateSeq>, Vec<P::ControlSeq>)
    where
        P::StateSeq: Clone,
        P::ControlSeq: Clone,
    {
        (
            self.states.into_iter().cloned().collect(),
            self.controls.into_iter().cloned().collect(),
        )
    }
}

impl<P: EdgePayload> Clone for Trajectory<'_, P> {
    fn clone(&self) -> Self {
        Self {
            states: self.states.clone(),
            controls: self.controls.clone(),
        }
    }
}

impl<P: EdgePayload> PartialEq for Trajectory<'_, P>
where
    P::StateSeq: PartialEq,
    P::ControlSeq: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states && self.controls == other.controls
    }
}

impl<P: EdgePayload> fmt::Debug for Trajectory<'_, P>
where
    P::StateSeq: fmt::Debug,
    P::ControlSeq: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trajectory")
            .field("states", &self.states)
            .field("controls", &self.controls)
            .finish()
    }
}

impl<P: EdgePayload> Tree<P> {
    /// Segments stored on each node in `ids`, in the same order.
    ///
    /// `climb` yields leaf-to-root order; reverse it (or use
    /// [`Tree::playback`]) for execution order. Fails with
    /// [`TreeError::InvalidId`] on the first unknown id.
    pub fn trajectory(&self, ids: &[NodeId]) -> Result<Trajectory<'_, P>, TreeError> {
        let mut states = Vec::with_capacity(ids.len());
        let mut controls = Vec::with_capacity(ids.len());
        for &id in ids {
            self.ensure_exists(id)?;
            states.push(&self.x_seqs[id.0]);
            controls.push(&self.u_seqs[id.0]);
        }
        Ok(Trajectory { states, controls })
    }

    /// Segments from the root down to `id`, in execution order.
    pub fn playback(&self, id: NodeId) -> Result<Trajectory<'_, P>, TreeError> {
        let mut chain = self.climb(id)?;
        chain.reverse();
        self.trajectory(&chain)
    }
}
