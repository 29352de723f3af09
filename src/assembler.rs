//! The assembly pipeline: build, simplify, resolve, measure.

use derive_more::with_trait::{Deref, DerefMut};
use derive_more::From;
use log::{debug, info};

use crate::config::AssemblerConfig;
use crate::graph::builder::GraphBuilder;
use crate::graph::simplify::{SimplifyReport, Simplifier};
use crate::graph::ContigGraph;
use crate::observer::{AssemblyEvent, AssemblyObserver};
use crate::path::resolve_contigs;
use crate::stats::{n50_or_sentinel, AssemblyStats, GraphStats};
use crate::AssemblyError;

/// An assembled sequence.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deref, DerefMut, From)]
pub struct Contig(pub Vec<u8>);

impl std::fmt::Display for Contig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Result of an assembly run.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub k: usize,
    /// In the order their routes were recorded.
    pub contigs: Vec<Contig>,
    /// N50 of the contig lengths, `-1` if there is no contig.
    pub n50: i64,
    pub stats: AssemblyStats,
    /// The simplified graph the contigs were read from.
    pub graph_stats: GraphStats,
    pub simplify: SimplifyReport,
}

impl Assembly {
    pub fn lengths(&self) -> Vec<usize> {
        self.contigs.iter().map(|c| c.len()).collect()
    }
}

/// Runs the whole pipeline on a set of reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Assembler {
    config: AssemblerConfig,
}

impl Assembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Builds the initial graph. Fails on invalid parameters or if there is no read at all.
    pub fn build_graph<S: AsRef<[u8]>>(&self, reads: &[S]) -> Result<ContigGraph, AssemblyError> {
        self.config.validate()?;
        if reads.is_empty() {
            return Err(AssemblyError::EmptyInput("no reads to assemble"));
        }
        let graph = GraphBuilder::from_reads(reads, self.config.k)?;
        if self.config.should_check() {
            graph.check_invariants()?;
        }
        Ok(graph)
    }

    /// Simplifies the graph in place, checking that no edge weight was lost.
    pub fn simplify<O: AssemblyObserver + ?Sized>(
        &self,
        graph: &mut ContigGraph,
        observer: &mut O,
    ) -> Result<SimplifyReport, AssemblyError> {
        let weight_before = graph.total_weight();
        let report = Simplifier::new(self.config.should_check()).run(graph, observer)?;
        let weight_after = graph.total_weight();
        if weight_after != weight_before {
            return Err(AssemblyError::StructuralInvariantViolation(format!(
                "total weight went from {} to {} during simplification",
                weight_before, weight_after
            )));
        }
        Ok(report)
    }

    /// Assembles the reads into contigs.
    pub fn run<S, O>(&self, reads: &[S], observer: &mut O) -> Result<Assembly, AssemblyError>
    where
        S: AsRef<[u8]>,
        O: AssemblyObserver + ?Sized,
    {
        let mut graph = self.build_graph(reads)?;
        observer.on_event(&AssemblyEvent::GraphBuilt {
            nodes: graph.len(),
            edges: graph.edge_count(),
            total_weight: graph.total_weight(),
        });
        debug!("{}", GraphStats::of(&graph));

        let report = self.simplify(&mut graph, observer)?;
        debug!(
            "simplified down to {} nodes ({} contractions, {} trimmed)",
            graph.len(),
            report.contractions,
            report.trimmed
        );

        let contigs: Vec<Contig> = resolve_contigs(&graph, observer)
            .into_iter()
            .map(Contig::from)
            .collect();
        let lengths: Vec<usize> = contigs.iter().map(|c| c.len()).collect();
        let stats = AssemblyStats::from_lengths(&lengths);
        info!("assembled {}", stats);

        Ok(Assembly {
            k: self.config.k,
            n50: n50_or_sentinel(&lengths),
            contigs,
            stats,
            graph_stats: GraphStats::of(&graph),
            simplify: report,
        })
    }
}
