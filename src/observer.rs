//! Hook invoked at the phase boundaries of an assembly run.

use log::{debug, info};

use crate::graph::simplify::Pass;
use crate::graph::NodeId;
use crate::path::SearchOutcome;

/// Progress notifications emitted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyEvent {
    /// The initial graph is complete.
    GraphBuilt {
        nodes: usize,
        edges: usize,
        total_weight: u64,
    },
    /// A simplification pass and its purge are complete.
    PassFinished {
        pass: Pass,
        contractions: usize,
        trimmed: usize,
        purged: usize,
        live_nodes: usize,
    },
    /// The search from one source node is over.
    SourceSearched { source: NodeId, outcome: SearchOutcome },
    /// Every source has been searched.
    RoutesResolved { routes: usize },
}

/// Receives [AssemblyEvent]s.
pub trait AssemblyObserver {
    fn on_event(&mut self, event: &AssemblyEvent);
}

/// Ignores every event.
impl AssemblyObserver for () {
    fn on_event(&mut self, _event: &AssemblyEvent) {}
}

/// Keeps every event, in order.
impl AssemblyObserver for Vec<AssemblyEvent> {
    fn on_event(&mut self, event: &AssemblyEvent) {
        self.push(event.clone());
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl AssemblyObserver for LogObserver {
    fn on_event(&mut self, event: &AssemblyEvent) {
        match event {
            AssemblyEvent::GraphBuilt {
                nodes,
                edges,
                total_weight,
            } => info!(
                "graph built: {} nodes, {} edges, total weight {}",
                crate::format_int(*nodes),
                crate::format_int(*edges),
                total_weight
            ),
            AssemblyEvent::PassFinished {
                pass,
                contractions,
                trimmed,
                purged,
                live_nodes,
            } => info!(
                "simplification from {}: {} contractions, {} trimmed, {} purged, {} nodes left",
                pass,
                crate::format_int(*contractions),
                crate::format_int(*trimmed),
                crate::format_int(*purged),
                crate::format_int(*live_nodes)
            ),
            AssemblyEvent::SourceSearched { source, outcome } => {
                debug!("search from node {}: {}", source, outcome)
            }
            AssemblyEvent::RoutesResolved { routes } => info!("{} routes resolved", routes),
        }
    }
}
