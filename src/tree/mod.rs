//! Append-only planning tree
//!
//! Nodes live in one arena: a flat row-major state buffer plus one column
//! per edge field, all indexed by [`NodeId`]. Growth only ever pushes, so
//! ids are stable and `parent < child` holds for every edge.

mod node;
mod trajectory;
mod traversal;

pub use node::{NodeId, NodeRef};
pub use trajectory::Trajectory;
pub use traversal::Climb;

use std::fmt;
use std::ops::Index;
use std::slice::ChunksExact;

use tracing::{debug, trace, warn};

use crate::payload::{EdgePayload, InconsistentSeedControl, LqrEdge};
use crate::{TreeConfig, TreeError};

/// Planning tree over states of a fixed, runtime-chosen dimension.
///
/// `P` supplies the opaque per-edge payload types; the tree stores and
/// returns them verbatim.
pub struct Tree<P: EdgePayload = LqrEdge> {
    /// State dimension, fixed by the seed state
    nstates: usize,

    /// Control dimension derived from the seed gain (0 if it was rejected)
    ncontrols: usize,

    /// Row-major states, `nstates` values per node
    states: Vec<f64>,

    pub(crate) parents: Vec<Option<NodeId>>,
    pub(crate) gains: Vec<P::Gain>,
    pub(crate) x_seqs: Vec<P::StateSeq>,
    pub(crate) u_seqs: Vec<P::ControlSeq>,

    /// Diagnostic recorded when the seed gain was inconsistent
    seed_control_issue: Option<InconsistentSeedControl>,
}

impl<P: EdgePayload> Tree<P> {
    /// Create a tree rooted at `seed_state` with default configuration.
    pub fn new(seed_state: impl AsRef<[f64]>, seed_gain: P::Gain) -> Result<Self, TreeError> {
        Self::with_config(seed_state, seed_gain, TreeConfig::default())
    }

    /// Create a tree rooted at `seed_state`.
    ///
    /// An inconsistent seed gain is logged and recorded (see
    /// [`Tree::seed_control_issue`]) and the root gets an empty control
    /// sequence. Only [`TreeConfig::strict_seed_control`] turns it into an error.
    pub fn with_config(
        seed_state: impl AsRef<[f64]>,
        seed_gain: P::Gain,
        config: TreeConfig,
    ) -> Result<Self, TreeError> {
        let seed_state = seed_state.as_ref();
        let nstates = seed_state.len();
        if nstates == 0 {
            return Err(TreeError::EmptySeedState);
        }

        let checked = P::seed_controls(&seed_gain, nstates).and_then(|actual| {
            match config.expected_controls {
                Some(expected) if expected != actual => {
                    Err(InconsistentSeedControl::ControlCount { expected, actual })
                }
                _ => Ok(actual),
            }
        });
        let (ncontrols, seed_control_issue) = match checked {
            Ok(ncontrols) => (ncontrols, None),
            Err(issue) if config.strict_seed_control => return Err(issue.into()),
            Err(issue) => {
                warn!(%issue, "inconsistent seed control, continuing without root control feature");
                (0, Some(issue))
            }
        };

        let capacity = config.capacity.max(1);
        let mut tree = Self {
            nstates,
            ncontrols,
            states: Vec::new(),
            parents: Vec::new(),
            gains: Vec::new(),
            x_seqs: Vec::new(),
            u_seqs: Vec::new(),
            seed_control_issue,
        };
        tree.reserve(capacity);

        tree.states.extend_from_slice(seed_state);
        tree.parents.push(None);
        tree.gains.push(seed_gain);
        tree.x_seqs.push(P::root_state_seq(nstates));
        tree.u_seqs.push(P::root_control_seq(ncontrols));

        debug!(nstates, ncontrols, capacity, "tree seeded");
        Ok(tree)
    }

    /// Append a child of `parent` and return its id.
    ///
    /// Fails with [`TreeError::InvalidParent`] if `parent` is not in the
    /// tree and [`TreeError::StateDimension`] if `state` has the wrong
    /// length. A failed call leaves the tree untouched.
    pub fn add_node(
        &mut self,
        parent: NodeId,
        state: impl AsRef<[f64]>,
        gain: P::Gain,
        x_seq: P::StateSeq,
        u_seq: P::ControlSeq,
    ) -> Result<NodeId, TreeError> {
        let size = self.size();
        if parent.0 >= size {
            return Err(TreeError::InvalidParent {
                parent: raw_index(parent.0),
                size,
            });
        }

        let state = state.as_ref();
        if state.len() != self.nstates {
            return Err(TreeError::StateDimension {
                expected: self.nstates,
                actual: state.len(),
            });
        }

        let id = NodeId(size);
        self.states.extend_from_slice(state);
        self.parents.push(Some(parent));
        self.gains.push(gain);
        self.x_seqs.push(x_seq);
        self.u_seqs.push(u_seq);

        trace!(id = id.0, parent = parent.0, "node appended");
        Ok(id)
    }

    /// Resolve a raw parent index supplied by a sampler.
    pub fn checked_parent(&self, raw: i64) -> Result<NodeId, TreeError> {
        self.resolve(raw).ok_or(TreeError::InvalidParent {
            parent: raw,
            size: self.size(),
        })
    }

    /// Resolve a raw node index supplied by a caller.
    pub fn checked_id(&self, raw: i64) -> Result<NodeId, TreeError> {
        self.resolve(raw).ok_or(TreeError::InvalidId {
            id: raw,
            size: self.size(),
        })
    }

    fn resolve(&self, raw: i64) -> Option<NodeId> {
        usize::try_from(raw)
            .ok()
            .filter(|&index| index < self.size())
            .map(NodeId)
    }

    pub(crate) fn ensure_exists(&self, id: NodeId) -> Result<(), TreeError> {
        if id.0 < self.size() {
            Ok(())
        } else {
            Err(TreeError::InvalidId {
                id: raw_index(id.0),
                size: self.size(),
            })
        }
    }

    /// Reserve room for at least `additional` more nodes.
    ///
    /// Capacity is only a hint: a request that overflows or cannot be
    /// allocated is logged and leaves the tree as it was.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            warn!(additional, %err, "node reservation skipped");
        }
    }

    /// Reserve room for at least `additional` more nodes, failing with
    /// [`TreeError::CapacityOverflow`] instead of aborting.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TreeError> {
        let overflow = |_| TreeError::CapacityOverflow { nodes: additional };
        let values = additional
            .checked_mul(self.nstates)
            .ok_or(TreeError::CapacityOverflow { nodes: additional })?;
        self.states.try_reserve(values).map_err(overflow)?;
        self.parents.try_reserve(additional).map_err(overflow)?;
        self.gains.try_reserve(additional).map_err(overflow)?;
        self.x_seqs.try_reserve(additional).map_err(overflow)?;
        self.u_seqs.try_reserve(additional).map_err(overflow)?;
        Ok(())
    }

    /// State dimension
    pub fn nstates(&self) -> usize {
        self.nstates
    }

    /// Control dimension encoded by the seed gain (0 if it was rejected)
    pub fn ncontrols(&self) -> usize {
        self.ncontrols
    }

    /// Number of nodes, which is also the next id to be assigned
    pub fn size(&self) -> usize {
        self.parents.len()
    }

    /// Alias for [`Tree::size`]
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Always false: the root exists from construction on
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Id of the root node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Why the seed gain was rejected, if it was
    pub fn seed_control_issue(&self) -> Option<&InconsistentSeedControl> {
        self.seed_control_issue.as_ref()
    }

    /// Borrowed view of one node
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, P>> {
        (id.0 < self.size()).then(|| NodeRef::new(self, id))
    }

    /// Iterate over every node in id order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeRef<'_, P>> + '_ {
        (0..self.size()).map(move |i| NodeRef::new(self, NodeId(i)))
    }

    /// Parent of `id` (`None` for the root or an unknown id)
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// Parent column
    pub fn parents(&self) -> &[Option<NodeId>] {
        &self.parents
    }

    /// Parent column as raw indices, `-1` marking the root
    pub fn parent_indices(&self) -> Vec<i64> {
        self.parents
            .iter()
            .map(|parent| parent.map_or(-1, |p| raw_index(p.0)))
            .collect()
    }

    /// State of `id`
    pub fn state(&self, id: NodeId) -> Option<&[f64]> {
        (id.0 < self.size()).then(|| self.state_row(id.0))
    }

    /// All states, row-major with `nstates` values per node
    pub fn states(&self) -> &[f64] {
        &self.states
    }

    /// States one row per node
    pub fn state_rows(&self) -> ChunksExact<'_, f64> {
        self.states.chunks_exact(self.nstates)
    }

    pub(crate) fn state_row(&self, index: usize) -> &[f64] {
        let start = index * self.nstates;
        &self.states[start..start + self.nstates]
    }

    /// Gain of the edge into `id`
    pub fn gain(&self, id: NodeId) -> Option<&P::Gain> {
        self.gains.get(id.0)
    }

    /// Gain column
    pub fn gains(&self) -> &[P::Gain] {
        &self.gains
    }

    /// State segment of the edge into `id`
    pub fn x_seq(&self, id: NodeId) -> Option<&P::StateSeq> {
        self.x_seqs.get(id.0)
    }

    /// State segment column
    pub fn x_seqs(&self) -> &[P::StateSeq] {
        &self.x_seqs
    }

    /// Control segment of the edge into `id`
    pub fn u_seq(&self, id: NodeId) -> Option<&P::ControlSeq> {
        self.u_seqs.get(id.0)
    }

    /// Control segment column
    pub fn u_seqs(&self) -> &[P::ControlSeq] {
        &self.u_seqs
    }
}

impl<P: EdgePayload> Index<NodeId> for Tree<P> {
    type Output = [f64];

    fn index(&self, id: NodeId) -> &Self::Output {
        self.state_row(id.0)
    }
}

impl<P: EdgePayload> fmt::Debug for Tree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nstates", &self.nstates)
            .field("ncontrols", &self.ncontrols)
            .field("size", &self.size())
            .field("seed_control_issue", &self.seed_control_issue)
            .finish_non_exhaustive()
    }
}

fn raw_index(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
