//! Minor stats about the graph and the assembled contigs

use derive_more::Display;
use textplots::{Chart, Plot, Shape};

use crate::graph::ContigGraph;
use crate::{format_int, AssemblyError};

/// Value reported in place of the N50 of an empty assembly.
pub const N50_SENTINEL: i64 = -1;

//####################################################################################
//                                    Nx metrics                                    //
//####################################################################################

/// Length of the shortest contig among the longest ones that together cover at
/// least `fraction` of the total length.
pub fn nx(lengths: &[usize], fraction: f64) -> Result<usize, AssemblyError> {
    if lengths.is_empty() {
        return Err(AssemblyError::EmptyInput("no contigs to compute Nx on"));
    }
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let total: usize = sorted.iter().sum();
    let target = total as f64 * fraction;
    let mut cumulative = 0;
    for &length in &sorted {
        cumulative += length;
        if cumulative as f64 >= target {
            return Ok(length);
        }
    }
    // only reached with fraction > 1
    Ok(sorted[sorted.len() - 1])
}

pub fn n50(lengths: &[usize]) -> Result<usize, AssemblyError> {
    nx(lengths, 0.5)
}

pub fn n90(lengths: &[usize]) -> Result<usize, AssemblyError> {
    nx(lengths, 0.9)
}

/// N50, or [N50_SENTINEL] if there is no contig.
pub fn n50_or_sentinel(lengths: &[usize]) -> i64 {
    n50(lengths).map(|n| n as i64).unwrap_or(N50_SENTINEL)
}

//####################################################################################
//                                  AssemblyStats                                   //
//####################################################################################

/// Summary of a set of contigs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
#[display(
    "{} contigs, {} bases in total, longest {}, N50 {}, N90 {}",
    format_int(*contigs),
    format_int(*total_length),
    format_int(*longest),
    n50,
    n90
)]
pub struct AssemblyStats {
    pub contigs: usize,
    pub total_length: usize,
    pub longest: usize,
    pub shortest: usize,
    pub n50: i64,
    pub n90: i64,
}

impl AssemblyStats {
    pub fn from_lengths(lengths: &[usize]) -> Self {
        Self {
            contigs: lengths.len(),
            total_length: lengths.iter().sum(),
            longest: lengths.iter().copied().max().unwrap_or(0),
            shortest: lengths.iter().copied().min().unwrap_or(0),
            n50: n50_or_sentinel(lengths),
            n90: n90(lengths).map(|n| n as i64).unwrap_or(N50_SENTINEL),
        }
    }
}

//####################################################################################
//                                    GraphStats                                    //
//####################################################################################

/// Size and degree distribution of a graph.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub total_edge_weight: u64,
    pub absorbed_weight: u64,
    pub sources: usize,
    pub sinks: usize,
    /// degree_histogram[d] = number of nodes with in + out degree d
    pub degree_histogram: Vec<usize>,
}

impl GraphStats {
    pub fn of(graph: &ContigGraph) -> Self {
        let mut stats = GraphStats::default();
        for (_, node) in graph.iter() {
            stats.nodes += 1;
            stats.edges += node.outgoing().len();
            stats.total_edge_weight += node.outgoing().total_weight();
            stats.absorbed_weight += node.absorbed_weight();
            stats.sources += node.is_source() as usize;
            stats.sinks += node.is_sink() as usize;

            let degree = node.incoming().len() + node.outgoing().len();
            if stats.degree_histogram.len() <= degree {
                stats.degree_histogram.resize(degree + 1, 0);
            }
            stats.degree_histogram[degree] += 1;
        }
        stats
    }
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph contains:\n  - {} nodes ({} sources, {} sinks)\n  - {} edges (weight {}, {} absorbed)\n  degree histogram: {:?}",
            format_int(self.nodes),
            format_int(self.sources),
            format_int(self.sinks),
            format_int(self.edges),
            self.total_edge_weight,
            self.absorbed_weight,
            self.degree_histogram
        )
    }
}

//####################################################################################
//                                    Histograms                                    //
//####################################################################################

/// Bins contig lengths into `nb_bins` bins of equal width, as `(bin start, count)`.
pub fn length_histogram(lengths: &[usize], nb_bins: usize) -> Vec<(f32, f32)> {
    let (Some(&min), Some(&max)) = (lengths.iter().min(), lengths.iter().max()) else {
        return Vec::new();
    };
    let nb_bins = nb_bins.max(1);
    // rounded up, so that the bins reach `max`
    let step = (max - min).div_ceil(nb_bins).max(1);

    let mut counts = vec![0usize; nb_bins];
    for &length in lengths {
        let bin = ((length - min) / step).min(nb_bins - 1);
        counts[bin] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| ((min + i * step) as f32, count as f32))
        .collect()
}

/// Prints a histogram of the contig lengths on the terminal.
pub fn print_length_histogram(lengths: &[usize]) {
    let bins = length_histogram(lengths, 40);
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        eprintln!("No contig to plot");
        return;
    };
    let width = (last.0 - first.0).max(1.0);
    println!("Contig length histogram:");
    Chart::new(160, 60, first.0, first.0 + width * 1.05)
        .lineplot(&Shape::Bars(&bins))
        .display();
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn n50_reaches_half_of_total() {
        // total 27, half 13.5: 10 alone is not enough, 10 + 8 is
        assert_eq!(n50(&[2, 3, 4, 8, 10]).unwrap(), 8);
        assert_eq!(n50(&[10, 2, 8, 3, 4]).unwrap(), 8);
        // the longest contig alone covers half
        assert_eq!(n50(&[2, 3, 4, 8, 20]).unwrap(), 20);
        assert_eq!(n50(&[5]).unwrap(), 5);
        assert_eq!(n50(&[4, 4]).unwrap(), 4);
    }

    #[test]
    fn n50_of_nothing() {
        assert!(matches!(n50(&[]), Err(AssemblyError::EmptyInput(_))));
        assert_eq!(n50_or_sentinel(&[]), N50_SENTINEL);
        assert_eq!(n50_or_sentinel(&[7, 1]), 7);
    }

    #[test]
    fn n90() {
        assert_eq!(super::n90(&[2, 3, 4, 8, 10]).unwrap(), 3);
    }

    #[test]
    fn assembly_stats() {
        let stats = AssemblyStats::from_lengths(&[2, 3, 4, 8, 10]);
        assert_eq!(stats.contigs, 5);
        assert_eq!(stats.total_length, 27);
        assert_eq!(stats.longest, 10);
        assert_eq!(stats.shortest, 2);
        assert_eq!(stats.n50, 8);
        assert_eq!(
            stats.to_string(),
            "5 contigs, 27 bases in total, longest 10, N50 8, N90 3"
        );
        assert_eq!(AssemblyStats::from_lengths(&[]).n50, N50_SENTINEL);
    }

    #[test]
    fn histogram_bins() {
        assert!(length_histogram(&[], 10).is_empty());
        let bins = length_histogram(&[10, 10, 20, 30], 2);
        assert_eq!(bins, vec![(10.0, 2.0), (20.0, 2.0)]);
        let single = length_histogram(&[5, 5], 4);
        assert_eq!(single.iter().map(|b| b.1).sum::<f32>(), 2.0);
    }

    #[test]
    fn histogram_uneven_range() {
        // range 79 over 40 bins: width 2, two lengths per bin
        let lengths: Vec<usize> = (100..180).collect();
        let bins = length_histogram(&lengths, 40);
        assert_eq!(bins.len(), 40);
        assert_eq!(bins[0], (100.0, 2.0));
        assert_eq!(bins[39], (178.0, 2.0));
        assert!(bins.iter().all(|&(_, count)| count == 2.0));
    }
}
