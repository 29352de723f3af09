//! Routes through the simplified graph.

use derive_more::with_trait::{Deref, DerefMut};

use crate::graph::{ContigGraph, NodeId};

/// A list of consecutive nodes, from a source to an end node.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deref, DerefMut)]
pub struct Route(pub Vec<NodeId>);

impl Route {
    /// Total sequence length of the route.
    pub fn seq_len(&self, graph: &ContigGraph) -> usize {
        self.iter().map(|&id| graph.sequence(id).len()).sum()
    }

    /// Sequence length of the nodes strictly before position `pos`.
    pub fn prefix_len(&self, graph: &ContigGraph, pos: usize) -> usize {
        self[..pos].iter().map(|&id| graph.sequence(id).len()).sum()
    }

    /// The sequence spelled by the route.
    pub fn sequence(&self, graph: &ContigGraph) -> Vec<u8> {
        graph.path_seq(self)
    }

    pub fn end(&self) -> Option<NodeId> {
        self.last().copied()
    }
}

/// The route explored by a running search, with the running sequence length
/// at each position.
#[derive(Default, Debug)]
pub(crate) struct CurrentRoute {
    nodes: Vec<NodeId>,
    // lengths[i] = sequence length of nodes[..=i]
    lengths: Vec<usize>,
}

impl CurrentRoute {
    pub(crate) fn depth(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn push(&mut self, node: NodeId, seq_len: usize) {
        let total = self.seq_len() + seq_len;
        self.nodes.push(node);
        self.lengths.push(total);
    }

    pub(crate) fn truncate(&mut self, depth: usize) {
        self.nodes.truncate(depth);
        self.lengths.truncate(depth);
    }

    pub(crate) fn seq_len(&self) -> usize {
        self.lengths.last().copied().unwrap_or(0)
    }

    pub(crate) fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn to_route(&self) -> Route {
        Route(self.nodes.clone())
    }
}
