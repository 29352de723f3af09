//! The contig node store: an arena of nodes addressed by [NodeId], with weighted,
//! bidirectional adjacency.
//!
//! Nodes never hold references to each other, only ids. A node is removed in two
//! steps: it is first tombstoned (marked `deleted`, adjacency cleared) while a
//! rewrite pass is running, then physically dropped by [ContigGraph::purge] once
//! the pass is over. Purging compacts the arena, so ids are only stable between
//! two purges.

pub mod builder;
pub mod simplify;

use derive_more::{Display, From};
use smallvec::SmallVec;

use std::fmt::Formatter;

use crate::AssemblyError;

/// Multiplicity of an edge, i.e. how many times the transition was observed in the reads.
pub type Weight = u32;

//####################################################################################
//                                     NodeId                                       //
//####################################################################################

/// Index of a node in a [ContigGraph].
#[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

//####################################################################################
//                                    Adjacency                                     //
//####################################################################################

/// A small map from neighbour id to edge weight.
///
/// Before simplification a node has at most one neighbour per base in each
/// direction, so four entries are stored inline. Insertion order is kept, which
/// makes every traversal of the graph deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency(SmallVec<[(NodeId, Weight); 4]>);

impl Adjacency {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<Weight> {
        self.0.iter().find(|(n, _)| *n == id).map(|&(_, w)| w)
    }

    /// Sets the weight of the edge to `id`, returning the previous weight if any.
    pub fn insert(&mut self, id: NodeId, weight: Weight) -> Option<Weight> {
        match self.0.iter_mut().find(|(n, _)| *n == id) {
            Some((_, w)) => Some(std::mem::replace(w, weight)),
            None => {
                self.0.push((id, weight));
                None
            }
        }
    }

    /// Adds `weight` to the edge to `id`, creating it if needed. Returns the new weight.
    pub fn add(&mut self, id: NodeId, weight: Weight) -> Weight {
        match self.0.iter_mut().find(|(n, _)| *n == id) {
            Some((_, w)) => {
                *w += weight;
                *w
            }
            None => {
                self.0.push((id, weight));
                weight
            }
        }
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Weight> {
        let pos = self.0.iter().position(|(n, _)| *n == id)?;
        Some(self.0.remove(pos).1)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The only entry, if there is exactly one.
    pub fn single(&self) -> Option<(NodeId, Weight)> {
        match self.0.as_slice() {
            [entry] => Some(*entry),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Weight)> + '_ {
        self.0.iter().copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().map(|&(id, _)| id)
    }

    pub fn total_weight(&self) -> u64 {
        self.0.iter().map(|&(_, w)| w as u64).sum()
    }

    // every key must map to a live node in `remap`
    fn remap(&mut self, remap: &[Option<NodeId>]) {
        for (id, _) in self.0.iter_mut() {
            let new_id = remap[id.0];
            debug_assert!(new_id.is_some(), "edge to purged node {}", id);
            if let Some(new_id) = new_id {
                *id = new_id;
            }
        }
    }
}

//####################################################################################
//                                   ContigNode                                     //
//####################################################################################

/// A node of the graph: a (k-1)-mer right after construction, a longer
/// fragment once chains have been contracted into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContigNode {
    sequence: Vec<u8>,
    incoming: Adjacency,
    outgoing: Adjacency,
    deleted: bool,
    // the (k-2)-base overlap with the predecessors has been dropped
    trimmed: bool,
    // weight of the internal edges folded into this node
    absorbed_weight: u64,
}

impl ContigNode {
    fn new(sequence: Vec<u8>) -> Self {
        Self {
            sequence,
            ..Default::default()
        }
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn incoming(&self) -> &Adjacency {
        &self.incoming
    }

    pub fn outgoing(&self) -> &Adjacency {
        &self.outgoing
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_trimmed(&self) -> bool {
        self.trimmed
    }

    pub fn absorbed_weight(&self) -> u64 {
        self.absorbed_weight
    }

    pub fn is_source(&self) -> bool {
        self.incoming.is_empty()
    }

    pub fn is_sink(&self) -> bool {
        self.outgoing.is_empty()
    }

    pub fn is_fork(&self) -> bool {
        self.outgoing.len() > 1
    }

    pub fn is_merge(&self) -> bool {
        self.incoming.len() > 1
    }
}

//####################################################################################
//                                   ContigGraph                                    //
//####################################################################################

/// The node store. It exclusively owns every node.
#[derive(Debug, Clone)]
pub struct ContigGraph {
    k: usize,
    nodes: Vec<ContigNode>,
    tombstones: usize,
}

impl std::fmt::Display for ContigGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Graph (k={}) with {} nodes and {} edges",
            self.k,
            self.len(),
            self.edge_count()
        )
    }
}

/// Basic methods for graph manipulation
impl ContigGraph {
    pub(crate) fn with_k(k: usize) -> Self {
        Self {
            k,
            nodes: Vec::new(),
            tombstones: 0,
        }
    }

    /// The k-mer size the graph was built with.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.tombstones
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tombstoned nodes waiting for a purge.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// returns a ref to the node, live or tombstoned. Panics if the id is out of range.
    pub fn node(&self, id: NodeId) -> &ContigNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut ContigNode {
        &mut self.nodes[id.0]
    }

    pub fn sequence(&self, id: NodeId) -> &[u8] {
        &self.nodes[id.0].sequence
    }

    /// Iterates over the live nodes, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ContigNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.deleted)
            .map(|(i, node)| (NodeId(i), node))
    }

    /// Live nodes with no incoming edge.
    pub fn sources(&self) -> Vec<NodeId> {
        self.iter().filter(|(_, n)| n.is_source()).map(|(id, _)| id).collect()
    }

    /// Live nodes with more than one outgoing edge.
    pub fn forks(&self) -> Vec<NodeId> {
        self.iter().filter(|(_, n)| n.is_fork()).map(|(id, _)| id).collect()
    }

    /// Live nodes with more than one incoming edge.
    pub fn merges(&self) -> Vec<NodeId> {
        self.iter().filter(|(_, n)| n.is_merge()).map(|(id, _)| id).collect()
    }

    /// Looks up a live node by its sequence (linear scan).
    pub fn find(&self, sequence: &[u8]) -> Option<NodeId> {
        self.iter()
            .find(|(_, n)| n.sequence == sequence)
            .map(|(id, _)| id)
    }

    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.nodes.get(from.0)?.outgoing.get(to)
    }

    pub fn edge_count(&self) -> usize {
        self.iter().map(|(_, n)| n.outgoing.len()).sum()
    }

    /// Sum of the weights of all live edges.
    pub fn total_edge_weight(&self) -> u64 {
        self.iter().map(|(_, n)| n.outgoing.total_weight()).sum()
    }

    /// Sum of the edge weights folded into nodes by contraction.
    pub fn absorbed_weight(&self) -> u64 {
        self.iter().map(|(_, n)| n.absorbed_weight).sum()
    }

    /// Edge weight plus absorbed weight. Constant under contraction.
    pub fn total_weight(&self) -> u64 {
        self.total_edge_weight() + self.absorbed_weight()
    }

    /// Concatenates the sequences of the given nodes.
    pub fn path_seq(&self, path: &[NodeId]) -> Vec<u8> {
        let len = path.iter().map(|&id| self.nodes[id.0].sequence.len()).sum();
        let mut seq = Vec::with_capacity(len);
        for &id in path {
            seq.extend_from_slice(&self.nodes[id.0].sequence);
        }
        seq
    }
}

/// Mutation primitives, used by the builder and the simplifier
impl ContigGraph {
    pub(crate) fn push_node(&mut self, sequence: Vec<u8>) -> NodeId {
        self.nodes.push(ContigNode::new(sequence));
        NodeId(self.nodes.len() - 1)
    }

    /// Adds `weight` to the edge `from -> to` on both sides.
    pub(crate) fn add_edge_weight(&mut self, from: NodeId, to: NodeId, weight: Weight) -> Weight {
        let w = self.nodes[from.0].outgoing.add(to, weight);
        let w_back = self.nodes[to.0].incoming.add(from, weight);
        debug_assert_eq!(w, w_back, "asymmetric edge {} -> {}", from, to);
        w
    }

    /// Marks the node as deleted and drops its adjacency. Neighbours must have
    /// been rewired beforehand.
    pub(crate) fn tombstone(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        if node.deleted {
            return;
        }
        node.deleted = true;
        node.incoming.clear();
        node.outgoing.clear();
        node.sequence = Vec::new();
        self.tombstones += 1;
    }

    /// Physically removes every tombstoned node and compacts the ids of the
    /// remaining ones. Returns the number of purged nodes.
    ///
    /// Fails with [AssemblyError::StructuralInvariantViolation] (leaving the
    /// graph untouched) if a tombstone still has edges or a live node still
    /// points at one.
    pub fn purge(&mut self) -> Result<usize, AssemblyError> {
        if self.tombstones == 0 {
            return Ok(0);
        }

        // new position of every live node
        let mut remap = vec![None; self.nodes.len()];
        let mut next = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.deleted {
                if !node.incoming.is_empty() || !node.outgoing.is_empty() {
                    return Err(AssemblyError::StructuralInvariantViolation(format!(
                        "tombstoned node {} still has edges",
                        i
                    )));
                }
            } else {
                remap[i] = Some(NodeId(next));
                next += 1;
            }
        }

        // no live node may point at a tombstone
        for (id, node) in self.iter() {
            if let Some(dangling) = node
                .incoming
                .ids()
                .chain(node.outgoing.ids())
                .find(|n| remap.get(n.0).copied().flatten().is_none())
            {
                return Err(AssemblyError::StructuralInvariantViolation(format!(
                    "node {} references purged node {}",
                    id, dangling
                )));
            }
        }

        let purged = self.tombstones;
        let old_nodes = std::mem::take(&mut self.nodes);
        self.nodes = old_nodes
            .into_iter()
            .filter(|node| !node.deleted)
            .map(|mut node| {
                node.incoming.remap(&remap);
                node.outgoing.remap(&remap);
                node
            })
            .collect();
        self.tombstones = 0;
        Ok(purged)
    }

    /// Checks edge symmetry, weights and tombstones.
    pub fn check_invariants(&self) -> Result<(), AssemblyError> {
        let violation = |msg: String| Err(AssemblyError::StructuralInvariantViolation(msg));

        for (i, node) in self.nodes.iter().enumerate() {
            let id = NodeId(i);
            if node.deleted {
                if !node.incoming.is_empty() || !node.outgoing.is_empty() {
                    return violation(format!("tombstoned node {} still has edges", id));
                }
                continue;
            }
            for (to, w) in node.outgoing.iter() {
                if w == 0 {
                    return violation(format!("edge {} -> {} has weight 0", id, to));
                }
                match self.nodes.get(to.0) {
                    None => return violation(format!("edge {} -> {} points outside the store", id, to)),
                    Some(other) if other.deleted => {
                        return violation(format!("edge {} -> {} points at a tombstone", id, to))
                    }
                    Some(other) if other.incoming.get(id) != Some(w) => {
                        return violation(format!(
                            "edge {} -> {} (weight {}) has no matching incoming entry",
                            id, to, w
                        ))
                    }
                    _ => {}
                }
            }
            for (from, w) in node.incoming.iter() {
                match self.nodes.get(from.0) {
                    None => return violation(format!("edge {} -> {} points outside the store", from, id)),
                    Some(other) if other.deleted || other.outgoing.get(id) != Some(w) => {
                        return violation(format!(
                            "incoming edge {} -> {} (weight {}) has no matching outgoing entry",
                            from, id, w
                        ))
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
