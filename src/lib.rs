/*! # rust_contigs: de Bruijn graph assembly of short reads
This crate assembles contigs from a set of short, exact reads. Reads are cut into
(k-1)-mers that become the nodes of a weighted de Bruijn graph, the graph is
contracted in place down to its branching skeleton, and a weight-greedy
depth-first search turns the skeleton into contig sequences.

```no_run
use rust_contigs::{Assembler, AssemblerConfig};

let reads: Vec<Vec<u8>> = vec![b"ACGTTGCA".to_vec(), b"GTTGCATT".to_vec()];
let config = AssemblerConfig { k: 5, ..Default::default() };
let assembly = Assembler::new(config).run(&reads, &mut ()).unwrap();
println!("{} contigs, N50 = {}", assembly.contigs.len(), assembly.n50);
```
*/

pub mod assembler;
pub mod config;
pub mod fastx_reader;
pub mod graph;
pub mod observer;
pub mod output;
pub mod path;
pub mod stats;

pub use assembler::{Assembler, Assembly, Contig};
pub use config::AssemblerConfig;
pub use graph::builder::GraphBuilder;
pub use graph::simplify::{SimplifyReport, Simplifier};
pub use graph::{Adjacency, ContigGraph, ContigNode, NodeId, Weight};
pub use observer::{AssemblyEvent, AssemblyObserver, LogObserver};
pub use path::{PathResolver, SearchOutcome};

//####################################################################################
//                              Custom errors                                       //
//####################################################################################

use thiserror::Error;

/// Everything that can go wrong during an assembly run.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A run parameter is out of bounds; raised before any graph work begins.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },
    /// Nothing to work with: no reads, or no contigs to summarise.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    /// The graph rewrite logic broke one of the store invariants.
    #[error("structural invariant violated: {0}")]
    StructuralInvariantViolation(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse reads: {0}")]
    Parse(String),
}

impl From<needletail::errors::ParseError> for AssemblyError {
    fn from(err: needletail::errors::ParseError) -> Self {
        AssemblyError::Parse(err.to_string())
    }
}

//####################################################################################
//                             Utility functions                                    //
//####################################################################################

/// Format a long integer with commas
pub fn format_int(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut chars = s.chars().rev().peekable();

    while let Some(c) = chars.next() {
        result.push(c);
        if chars.peek().is_some() && result.len() % 4 == 3 {
            result.push(',');
        }
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn format_int_groups_thousands() {
        assert_eq!(format_int(0), "0");
        assert_eq!(format_int(999), "999");
        assert_eq!(format_int(1000), "1,000");
        assert_eq!(format_int(1234567), "1,234,567");
    }

    #[test]
    fn invalid_parameter_message() {
        let err = AssemblyError::InvalidParameter {
            name: "k",
            value: 1,
            reason: "must be at least 2",
        };
        assert_eq!(err.to_string(), "invalid parameter k = 1: must be at least 2");
    }
}
