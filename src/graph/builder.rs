//! To create graphs from reads.

use ahash::AHashMap;
use log::{debug, warn};

use super::{ContigGraph, NodeId};
use crate::config::validate_k;
use crate::AssemblyError;

/// Builds the initial de Bruijn graph, one node per distinct (k-1)-mer.
///
/// The builder owns the (k-1)-mer index for the duration of the construction
/// phase only: [GraphBuilder::finish] drops it and hands over the bare node
/// store, which is no longer deduplicated by content from then on.
pub struct GraphBuilder {
    graph: ContigGraph,
    index: AHashMap<Vec<u8>, NodeId>,
    nb_reads: usize,
    nb_short_reads: usize,
}

impl GraphBuilder {
    /// Fails with [AssemblyError::InvalidParameter] if `k < 2`.
    pub fn new(k: usize) -> Result<Self, AssemblyError> {
        validate_k(k)?;
        Ok(Self {
            graph: ContigGraph::with_k(k),
            index: AHashMap::new(),
            nb_reads: 0,
            nb_short_reads: 0,
        })
    }

    /// Slides a (k-1)-window over the read and records one edge per pair of
    /// consecutive windows.
    pub fn add_read(&mut self, read: &[u8]) {
        self.nb_reads += 1;
        let window = self.graph.k() - 1;
        if read.len() < window {
            self.nb_short_reads += 1;
            return;
        }

        let mut previous: Option<NodeId> = None;
        for kmer in read.windows(window) {
            let current = self.node_for(kmer);
            if let Some(previous) = previous {
                self.graph.add_edge_weight(previous, current, 1);
            }
            previous = Some(current);
        }
    }

    // look up the node of a (k-1)-mer, creating it if needed
    fn node_for(&mut self, kmer: &[u8]) -> NodeId {
        if let Some(&id) = self.index.get(kmer) {
            return id;
        }
        let id = self.graph.push_node(kmer.to_vec());
        self.index.insert(kmer.to_vec(), id);
        id
    }

    /// Number of distinct (k-1)-mers seen so far.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Ends the construction phase: the index is dropped, the store is returned.
    pub fn finish(self) -> ContigGraph {
        let Self {
            graph,
            index,
            nb_reads,
            nb_short_reads,
        } = self;
        drop(index);

        if nb_short_reads > 0 {
            warn!(
                "{} out of {} reads are shorter than k-1 = {} and were ignored",
                nb_short_reads,
                nb_reads,
                graph.k() - 1
            );
        }
        debug!("built {} from {} reads", graph.to_string().trim_end(), nb_reads);
        graph
    }

    /// Creates a graph from a list of reads.
    pub fn from_reads<S: AsRef<[u8]>>(reads: &[S], k: usize) -> Result<ContigGraph, AssemblyError> {
        let mut builder = Self::new(k)?;
        for read in reads {
            builder.add_read(read.as_ref());
        }
        Ok(builder.finish())
    }
}
