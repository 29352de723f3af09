use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rust_contigs::fastx_reader::read_sequences;
use rust_contigs::output::save_assembly;
use rust_contigs::stats::N50_SENTINEL;
use rust_contigs::{Assembler, AssemblerConfig, AssemblyError, AssemblyEvent, Contig};

fn generate_random_seq_seed(n: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| b"ACGT"[rng.random_range(0..=3)]).collect()
}

// reads of length `len` starting every `step` bases, the last one ending on the last base
fn tile(genome: &[u8], len: usize, step: usize) -> Vec<Vec<u8>> {
    let mut reads: Vec<Vec<u8>> = (0..=genome.len() - len)
        .step_by(step)
        .map(|start| genome[start..start + len].to_vec())
        .collect();
    reads.push(genome[genome.len() - len..].to_vec());
    reads
}

fn assembler(k: usize) -> Assembler {
    Assembler::new(AssemblerConfig {
        k,
        check_invariants: true,
    })
}

#[test]
fn random_genome_is_reassembled() {
    let genome = generate_random_seq_seed(2000, 42);
    let reads = tile(&genome, 100, 20);

    let mut events: Vec<AssemblyEvent> = Vec::new();
    let assembly = assembler(31).run(&reads, &mut events).unwrap();
    assert_eq!(assembly.contigs, vec![Contig::from(genome.clone())]);
    assert_eq!(assembly.n50, 2000);
    assert_eq!(assembly.stats.total_length, 2000);
    assert_eq!(assembly.graph_stats.nodes, 1);
    assert!(matches!(
        events.first(),
        Some(AssemblyEvent::GraphBuilt { nodes: 1971, .. })
    ));
}

#[test]
fn two_genomes_two_contigs() {
    let first = generate_random_seq_seed(500, 1);
    let second = generate_random_seq_seed(800, 2);
    let mut reads = tile(&first, 60, 15);
    reads.extend(tile(&second, 60, 15));

    let assembly = assembler(21).run(&reads, &mut ()).unwrap();
    assert_eq!(
        assembly.contigs,
        vec![Contig::from(first), Contig::from(second)]
    );
    // 800 alone covers half of 1300
    assert_eq!(assembly.n50, 800);
    assert_eq!(assembly.stats.longest, 800);
}

#[test]
fn empty_read_set() {
    let reads: Vec<Vec<u8>> = Vec::new();
    assert!(matches!(
        assembler(21).run(&reads, &mut ()),
        Err(AssemblyError::EmptyInput(_))
    ));
}

#[test]
fn nothing_long_enough() {
    let assembly = assembler(21).run(&["ACGT", "GGCA"], &mut ()).unwrap();
    assert!(assembly.contigs.is_empty());
    assert_eq!(assembly.n50, N50_SENTINEL);
}

#[test]
fn invalid_k_fails_before_reading_reads() {
    let reads: Vec<Vec<u8>> = Vec::new();
    // the parameter is checked first, even without reads
    assert!(matches!(
        assembler(1).run(&reads, &mut ()),
        Err(AssemblyError::InvalidParameter { name: "k", value: 1, .. })
    ));
}

#[test]
fn file_round_trip() {
    let genome = generate_random_seq_seed(300, 7);
    let dir = tempfile::tempdir().unwrap();

    let input = dir.path().join("reads.fa");
    let mut file = std::fs::File::create(&input).unwrap();
    for (i, read) in tile(&genome, 50, 10).iter().enumerate() {
        writeln!(file, ">read_{}", i).unwrap();
        file.write_all(read).unwrap();
        writeln!(file).unwrap();
    }
    drop(file);

    let reads = read_sequences(&input).unwrap();
    let assembly = assembler(15).run(&reads, &mut ()).unwrap();
    let path = save_assembly(&assembly, dir.path().join("out"), "test").unwrap();
    assert_eq!(path, dir.path().join("out").join("test_k15_n50_300.fasta"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with(">contig_0 k=15 len=300\n"));
    let contigs = read_sequences(&path).unwrap();
    assert_eq!(contigs, vec![genome]);
}
