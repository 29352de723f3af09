//! Turns the simplified graph into contigs.
//!
//! One depth-first search is run from every source node. Successors are pushed
//! by ascending edge weight, so the best supported branch is explored first. A
//! search ends as soon as it either claims an end node nobody reached before,
//! beats the route already recorded for an end node, or splices a longer prefix
//! into a recorded route it runs into.
//!
//! The per-search `visited` set is local to [PathResolver::search]; ownership of
//! nodes by recorded routes lives in the resolver and survives across searches.

pub mod route;

use std::cmp::Reverse;

use ahash::{AHashMap, AHashSet};
use derive_more::Display;

use self::route::CurrentRoute;
pub use self::route::Route;
use crate::graph::{ContigGraph, NodeId, Weight};
use crate::observer::{AssemblyEvent, AssemblyObserver};

/// How a search from a source ended. `route` is the slot of the recorded route.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Reached an end node that no previous route ended on.
    #[display("claimed end node of route {route}")]
    Claimed { route: usize },
    /// Reached a claimed end node with a longer route, which replaced the old one.
    #[display("replaced route {route}")]
    Replaced { route: usize },
    /// Ran into a recorded route with a longer prefix, which was spliced in.
    #[display("spliced a prefix into route {route}")]
    Spliced { route: usize },
    /// Every reachable branch lost against recorded routes, or led nowhere.
    #[display("exhausted")]
    Exhausted,
}

/// Resolves routes over a frozen graph.
pub struct PathResolver<'a> {
    graph: &'a ContigGraph,
    routes: Vec<Route>,
    // end node -> route slot
    claims: AHashMap<NodeId, usize>,
    // node -> slot of the recorded route it belongs to
    owners: AHashMap<NodeId, usize>,
}

impl<'a> PathResolver<'a> {
    pub fn new(graph: &'a ContigGraph) -> Self {
        Self {
            graph,
            routes: Vec::new(),
            claims: AHashMap::new(),
            owners: AHashMap::new(),
        }
    }

    /// Routes recorded so far, by slot.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Slot of the route that currently owns `node`, if any.
    pub fn owner(&self, node: NodeId) -> Option<usize> {
        self.owners.get(&node).copied()
    }

    /// Searches every source, in id order, and returns the recorded routes.
    pub fn resolve<O: AssemblyObserver + ?Sized>(mut self, observer: &mut O) -> Vec<Route> {
        for source in self.graph.sources() {
            let outcome = self.search(source);
            observer.on_event(&AssemblyEvent::SourceSearched { source, outcome });
        }
        observer.on_event(&AssemblyEvent::RoutesResolved {
            routes: self.routes.len(),
        });
        self.routes
    }

    /// Runs the depth-first search from a single source.
    pub fn search(&mut self, source: NodeId) -> SearchOutcome {
        let graph = self.graph;
        let mut visited = AHashSet::new();
        let mut current = CurrentRoute::default();
        // (node, depth of the current route when it was pushed)
        let mut stack = vec![(source, 0)];

        while let Some((node, depth)) = stack.pop() {
            current.truncate(depth);
            if visited.contains(&node) {
                continue;
            }
            let contig = graph.node(node);

            // end node
            if contig.is_sink() {
                current.push(node, contig.sequence().len());
                match self.claims.get(&node).copied() {
                    None => {
                        let route = self.record(current.to_route());
                        return SearchOutcome::Claimed { route };
                    }
                    Some(route) if current.seq_len() > self.routes[route].seq_len(graph) => {
                        self.replace(route, current.to_route());
                        return SearchOutcome::Replaced { route };
                    }
                    // the recorded route wins, keep looking
                    Some(_) => continue,
                }
            }

            // node already on a recorded route
            if let Some(route) = self.owner(node) {
                if let Some(pos) = self.routes[route].iter().position(|&n| n == node) {
                    if current.seq_len() > self.routes[route].prefix_len(graph, pos) {
                        self.splice(route, pos, current.nodes());
                        return SearchOutcome::Spliced { route };
                    }
                    continue;
                }
            }

            visited.insert(node);
            current.push(node, contig.sequence().len());
            let mut successors: Vec<(NodeId, Weight)> = contig.outgoing().iter().collect();
            // the heaviest successor is popped first, ties go to the lowest id
            successors.sort_by_key(|&(id, weight)| (weight, Reverse(id)));
            for (succ, _) in successors {
                stack.push((succ, current.depth()));
            }
        }
        SearchOutcome::Exhausted
    }

    // store a new route and claim its nodes
    fn record(&mut self, route: Route) -> usize {
        let slot = self.routes.len();
        if let Some(end) = route.end() {
            self.claims.insert(end, slot);
        }
        for &node in route.iter() {
            self.owners.insert(node, slot);
        }
        self.routes.push(route);
        slot
    }

    // replace the route of `slot` by a longer route to the same end node
    fn replace(&mut self, slot: usize, route: Route) {
        self.release(slot, self.routes[slot].len());
        for &node in route.iter() {
            self.owners.insert(node, slot);
        }
        self.routes[slot] = route;
    }

    // replace the nodes before `pos` in the route of `slot` by `prefix`
    fn splice(&mut self, slot: usize, pos: usize, prefix: &[NodeId]) {
        self.release(slot, pos);
        for &node in prefix {
            self.owners.insert(node, slot);
        }
        let old = std::mem::take(&mut self.routes[slot]);
        let mut nodes = Vec::with_capacity(prefix.len() + old.len() - pos);
        nodes.extend_from_slice(prefix);
        nodes.extend_from_slice(&old[pos..]);
        self.routes[slot] = Route(nodes);
    }

    // drop the ownership of the nodes of the route before position `end`
    fn release(&mut self, slot: usize, end: usize) {
        for node in self.routes[slot][..end].iter() {
            if self.owners.get(node) == Some(&slot) {
                self.owners.remove(node);
            }
        }
    }
}

/// Resolves the routes of a graph and spells them out.
pub fn resolve_contigs<O: AssemblyObserver + ?Sized>(graph: &ContigGraph, observer: &mut O) -> Vec<Vec<u8>> {
    PathResolver::new(graph)
        .resolve(observer)
        .iter()
        .map(|route| route.sequence(graph))
        .collect()
}
