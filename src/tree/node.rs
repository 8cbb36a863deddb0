//! Node handles
//!
//! A node is not an object: it is an index shared by every per-node
//! column of the arena. [`NodeId`] is that index, [`NodeRef`] a borrowed
//! view across all columns for one id.

use std::fmt;

use super::Tree;
use crate::payload::EdgePayload;

/// Index of a node in insertion order (root = 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node, present in every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// Check if this is the root
    #[inline]
    pub fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Borrowed view of one node and the edge that reached it
pub struct NodeRef<'a, P: EdgePayload> {
    /// Node id
    pub id: NodeId,
    /// Parent id (`None` for the root)
    pub parent: Option<NodeId>,
    /// State vector (`nstates` components)
    pub state: &'a [f64],
    /// Feedback gain of the incoming edge
    pub gain: &'a P::Gain,
    /// State segment of the incoming edge
    pub x_seq: &'a P::StateSeq,
    /// Control segment of the incoming edge
    pub u_seq: &'a P::ControlSeq,
}

impl<'a, P: EdgePayload> NodeRef<'a, P> {
    pub(crate) fn new(tree: &'a Tree<P>, id: NodeId) -> Self {
        let i = id.0;
        Self {
            id,
            parent: tree.parents[i],
            state: tree.state_row(i),
            gain: &tree.gains[i],
            x_seq: &tree.x_seqs[i],
            u_seq: &tree.u_seqs[i],
        }
    }
}

impl<P: EdgePayload> Clone for NodeRef<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: EdgePayload> Copy for NodeRef<'_, P> {}

impl<P: EdgePayload> fmt::Debug for NodeRef<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
