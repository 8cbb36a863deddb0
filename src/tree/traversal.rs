//! Ancestor climb
//!
//! Follows parent links from a node to the root. Parents are always
//! inserted before their children, so ids strictly decrease along the
//! walk and it ends after at most `id + 1` steps.

use std::iter::FusedIterator;

use tracing::trace;

use super::{NodeId, Tree};
use crate::payload::EdgePayload;
use crate::TreeError;

/// Lazy walk from a node to the root, both inclusive
#[derive(Debug, Clone)]
pub struct Climb<'a> {
    parents: &'a [Option<NodeId>],
    next: Option<NodeId>,
}

impl Iterator for Climb<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.parents[current.0];
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(id) if id.is_root() => (1, Some(1)),
            // the root is always reached, and ids strictly decrease on the way
            Some(id) => (2, Some(id.0 + 1)),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Climb<'_> {}

impl<P: EdgePayload> Tree<P> {
    /// Ancestor chain `[id, parent(id), ..., root]`.
    ///
    /// Fails with [`TreeError::InvalidId`] if `id` is not in the tree.
    pub fn climb(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let chain: Vec<NodeId> = self.ancestors(id)?.collect();
        trace!(id = id.0, depth = chain.len() - 1, "climbed to root");
        Ok(chain)
    }

    /// Iterator form of [`Tree::climb`].
    pub fn ancestors(&self, id: NodeId) -> Result<Climb<'_>, TreeError> {
        self.ensure_exists(id)?;
        Ok(Climb {
            parents: &self.parents,
            next: Some(id),
        })
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> Result<usize, TreeError> {
        Ok(self.ancestors(id)?.count() - 1)
    }
}
