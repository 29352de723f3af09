//! In-place contraction of the graph down to its branching skeleton.
//!
//! Three passes are run, in this order, each one followed by a purge:
//! 1. from every source, contract the chain that follows it;
//! 2. for every fork, trim each successor down to its novel suffix and contract
//!    the chain that follows it;
//! 3. for every merge node, trim it and contract the chain that follows it.
//!
//! Trimming drops the (k-2)-base prefix a node shares with its predecessors, so
//! that concatenating the nodes of a path spells its sequence exactly once.

use std::collections::VecDeque;

use ahash::AHashSet;
use derive_more::{Add, AddAssign, Display};
use log::debug;

use super::{ContigGraph, NodeId};
use crate::observer::{AssemblyEvent, AssemblyObserver};
use crate::AssemblyError;

//####################################################################################
//                                   Contraction                                    //
//####################################################################################

impl ContigGraph {
    /// Greedily contracts the chain starting after `anchor` into `anchor`.
    ///
    /// Stops when the anchor is a sink or a fork, or when its successor has
    /// more than one incoming edge. Returns the number of absorbed nodes.
    pub fn contract_from(&mut self, anchor: NodeId) -> usize {
        let mut contractions = 0;
        while let Some(next) = self.contractible_successor(anchor) {
            self.absorb(anchor, next);
            contractions += 1;
        }
        contractions
    }

    // the unique successor of `anchor`, if it can be absorbed into it
    fn contractible_successor(&self, anchor: NodeId) -> Option<NodeId> {
        let node = self.node(anchor);
        if node.is_deleted() {
            return None;
        }
        let (next, _) = node.outgoing().single()?;
        if next == anchor || self.node(next).incoming().len() != 1 {
            return None;
        }
        Some(next)
    }

    // merge `next` into `anchor`. `anchor -> next` must be the only edge out of
    // `anchor` and the only edge into `next`.
    fn absorb(&mut self, anchor: NodeId, next: NodeId) {
        let overlap = self.k() - 2;

        let next_node = self.node_mut(next);
        let tail = std::mem::take(&mut next_node.outgoing);
        let next_seq = std::mem::take(&mut next_node.sequence);
        let next_absorbed = next_node.absorbed_weight;
        let novel = if next_node.trimmed {
            &next_seq[..]
        } else {
            &next_seq[overlap.min(next_seq.len())..]
        };
        next_node.incoming.clear();

        let anchor_node = self.node_mut(anchor);
        let internal = anchor_node.outgoing.remove(next).unwrap_or(0);
        anchor_node.absorbed_weight += internal as u64 + next_absorbed;
        anchor_node.sequence.extend_from_slice(novel);

        // rewire the successors of `next` onto `anchor`, weights unchanged
        for (succ, weight) in tail.iter() {
            let succ_node = self.node_mut(succ);
            succ_node.incoming.remove(next);
            succ_node.incoming.insert(anchor, weight);
            self.node_mut(anchor).outgoing.insert(succ, weight);
        }

        self.tombstone(next);
    }

    /// Drops the prefix a node shares with its predecessors, once.
    /// For a node that was never extended this keeps its terminal base only.
    /// Returns false if the node had already been trimmed.
    pub fn trim_overlap(&mut self, id: NodeId) -> bool {
        let overlap = self.k() - 2;
        let node = self.node_mut(id);
        if node.trimmed || node.deleted {
            return false;
        }
        let cut = overlap.min(node.sequence.len().saturating_sub(1));
        node.sequence.drain(..cut);
        node.trimmed = true;
        true
    }
}

//####################################################################################
//                                    Simplifier                                    //
//####################################################################################

/// The three simplification passes.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    #[display("sources")]
    Sources,
    #[display("forks")]
    Forks,
    #[display("merges")]
    Merges,
}

/// What a simplification run did to the graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Add, AddAssign)]
pub struct SimplifyReport {
    pub contractions: usize,
    pub trimmed: usize,
    pub purged: usize,
}

/// Runs the simplification passes on a graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct Simplifier {
    /// Check the store invariants after each purge.
    pub check_invariants: bool,
}

impl Simplifier {
    pub fn new(check_invariants: bool) -> Self {
        Self { check_invariants }
    }

    /// Runs the three passes until every anchor has been contracted.
    pub fn run<O: AssemblyObserver + ?Sized>(
        &self,
        graph: &mut ContigGraph,
        observer: &mut O,
    ) -> Result<SimplifyReport, AssemblyError> {
        let mut report = SimplifyReport::default();
        for pass in [Pass::Sources, Pass::Forks, Pass::Merges] {
            let pass_report = self.run_pass(graph, pass)?;
            debug!(
                "pass {}: {} contractions, {} trimmed, {} purged, {} nodes left",
                pass,
                pass_report.contractions,
                pass_report.trimmed,
                pass_report.purged,
                graph.len()
            );
            observer.on_event(&AssemblyEvent::PassFinished {
                pass,
                contractions: pass_report.contractions,
                trimmed: pass_report.trimmed,
                purged: pass_report.purged,
                live_nodes: graph.len(),
            });
            report += pass_report;
        }
        Ok(report)
    }

    /// Runs a single pass, followed by a purge.
    pub fn run_pass(&self, graph: &mut ContigGraph, pass: Pass) -> Result<SimplifyReport, AssemblyError> {
        let mut report = SimplifyReport::default();
        match pass {
            Pass::Sources => {
                for source in graph.sources() {
                    report.contractions += graph.contract_from(source);
                }
            }
            Pass::Forks => {
                // contracting from a successor can absorb a fork further down,
                // which turns the successor itself into a fork: requeue it
                let mut queue: VecDeque<NodeId> = graph.forks().into();
                let mut done = AHashSet::new();
                while let Some(fork) = queue.pop_front() {
                    if graph.node(fork).is_deleted() || !done.insert(fork) {
                        continue;
                    }
                    let successors: Vec<NodeId> = graph.node(fork).outgoing().ids().collect();
                    for succ in successors {
                        if graph.trim_overlap(succ) {
                            report.trimmed += 1;
                        }
                        report.contractions += graph.contract_from(succ);
                        if graph.node(succ).is_fork() && !done.contains(&succ) {
                            queue.push_back(succ);
                        }
                    }
                }
            }
            Pass::Merges => {
                for merge in graph.merges() {
                    if graph.trim_overlap(merge) {
                        report.trimmed += 1;
                    }
                    report.contractions += graph.contract_from(merge);
                }
            }
        }

        report.purged = graph.purge()?;
        if self.check_invariants {
            graph.check_invariants()?;
        }
        Ok(report)
    }
}

/// Simplifies the graph in place, without observer.
pub fn simplify(graph: &mut ContigGraph) -> Result<SimplifyReport, AssemblyError> {
    Simplifier::new(cfg!(debug_assertions)).run(graph, &mut ())
}
