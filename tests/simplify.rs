use proptest::prelude::*;

use rust_contigs::graph::simplify::{simplify, Pass};
use rust_contigs::{AssemblyEvent, ContigGraph, GraphBuilder, Simplifier};

fn simplified(reads: &[&str], k: usize) -> ContigGraph {
    let mut graph = GraphBuilder::from_reads(reads, k).unwrap();
    Simplifier::new(true).run(&mut graph, &mut ()).unwrap();
    graph
}

#[test]
fn chain_collapses_to_one_node() {
    // AC CG GT TT TG: five nodes, one edge between each pair
    let mut graph = GraphBuilder::from_reads(&["ACGTTG"], 3).unwrap();
    assert_eq!(graph.len(), 5);
    assert_eq!(graph.edge_count(), 4);

    let report = simplify(&mut graph).unwrap();
    assert_eq!(report.contractions, 4);
    assert_eq!(report.purged, 4);
    assert_eq!(graph.len(), 1);
    // first node in full, then one base per absorbed node
    let (id, node) = graph.iter().next().unwrap();
    assert_eq!(node.sequence(), b"ACGTTG");
    assert!(node.is_source() && node.is_sink());
    assert_eq!(node.absorbed_weight(), 4);
    assert_eq!(graph.sources(), vec![id]);
}

#[test]
fn fork_successors_do_not_repeat_the_fork() {
    // TTA TAC ACG, then ACG forks to CGG GGA and CGC GCC
    let reads = ["TTACGGA", "TTACGCC"];
    let graph = simplified(&reads, 4);
    assert_eq!(graph.len(), 3);

    let fork = graph.find(b"TTACG").unwrap();
    assert!(graph.node(fork).is_fork());
    let x = graph.find(b"GA").unwrap();
    let y = graph.find(b"CC").unwrap();
    assert_eq!(graph.edge_weight(fork, x), Some(1));
    assert_eq!(graph.edge_weight(fork, y), Some(1));
    assert_eq!(graph.path_seq(&[fork, x]), reads[0].as_bytes());
    assert_eq!(graph.path_seq(&[fork, y]), reads[1].as_bytes());
}

#[test]
fn merge_is_trimmed() {
    // GGA GAC and CCA CAC both lead to ACT CTT TTA
    let reads = ["GGACTTA", "CCACTTA"];
    let graph = simplified(&reads, 4);
    assert_eq!(graph.len(), 3);

    let (a, b) = (graph.find(b"GGAC").unwrap(), graph.find(b"CCAC").unwrap());
    let merge = graph.find(b"TTA").unwrap();
    assert!(graph.node(merge).is_merge());
    assert!(graph.node(merge).is_trimmed());
    assert_eq!(graph.path_seq(&[a, merge]), reads[0].as_bytes());
    assert_eq!(graph.path_seq(&[b, merge]), reads[1].as_bytes());
    // ACT -> CTT and CTT -> TTA, observed twice each
    assert_eq!(graph.node(merge).absorbed_weight(), 4);
    assert_eq!(graph.total_weight(), 8);
}

#[test]
fn passes_are_reported_in_order() {
    let mut graph = GraphBuilder::from_reads(&["GGACTTA", "CCACTTA"], 4).unwrap();
    let mut events: Vec<AssemblyEvent> = Vec::new();
    let report = Simplifier::new(true).run(&mut graph, &mut events).unwrap();

    let passes: Vec<Pass> = events
        .iter()
        .filter_map(|e| match e {
            AssemblyEvent::PassFinished { pass, .. } => Some(*pass),
            _ => None,
        })
        .collect();
    assert_eq!(passes, vec![Pass::Sources, Pass::Forks, Pass::Merges]);
    // GAC into GGA, CAC into CCA, then CTT and TTA into ACT
    assert_eq!(report.contractions, 4);
    assert_eq!(report.trimmed, 1);
    assert_eq!(report.purged, 4);
    assert_eq!(
        events[2],
        AssemblyEvent::PassFinished {
            pass: Pass::Merges,
            contractions: 2,
            trimmed: 1,
            purged: 2,
            live_nodes: 3,
        }
    );
}

#[test]
fn cycle_without_entry_is_left_alone() {
    let mut graph = GraphBuilder::from_reads(&["ACGTAC", "CGTACG"], 3).unwrap();
    let report = simplify(&mut graph).unwrap();
    assert_eq!(report.contractions, 0);
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.total_weight(), 8);
}

#[test]
fn simplification_is_idempotent() {
    let mut graph = GraphBuilder::from_reads(&["TTACGGA", "TTACGCC", "GGACTTA", "CCACTTA"], 4).unwrap();
    simplify(&mut graph).unwrap();
    let nodes = graph.len();
    let report = simplify(&mut graph).unwrap();
    assert_eq!(report.contractions, 0);
    assert_eq!(report.purged, 0);
    assert_eq!(graph.len(), nodes);
}

fn reads_strategy() -> impl Strategy<Value = (Vec<String>, usize)> {
    (prop::collection::vec("[ACGT]{1,40}", 1..10), 2usize..7)
}

proptest! {
    #[test]
    fn simplification_keeps_invariants((reads, k) in reads_strategy()) {
        let mut graph = GraphBuilder::from_reads(&reads, k).unwrap();
        prop_assert!(graph.check_invariants().is_ok());
        let weight = graph.total_edge_weight();
        prop_assert_eq!(graph.total_weight(), weight);

        let first = Simplifier::new(true).run(&mut graph, &mut ()).unwrap();
        prop_assert!(graph.check_invariants().is_ok());
        prop_assert_eq!(graph.tombstones(), 0);
        prop_assert_eq!(graph.total_weight(), weight);
        prop_assert_eq!(first.contractions, first.purged);

        // no live node references a removed one
        for (_, node) in graph.iter() {
            for other in node.incoming().ids().chain(node.outgoing().ids()) {
                prop_assert!(other.index() < graph.len());
                prop_assert!(!graph.node(other).is_deleted());
            }
        }

        let nodes = graph.len();
        let second = Simplifier::new(true).run(&mut graph, &mut ()).unwrap();
        prop_assert_eq!(second.contractions, 0);
        prop_assert_eq!(graph.len(), nodes);
        prop_assert_eq!(graph.total_weight(), weight);
    }
}
