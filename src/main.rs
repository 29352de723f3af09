use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rust_contigs::fastx_reader::read_sequences;
use rust_contigs::output::save_assembly;
use rust_contigs::stats::print_length_histogram;
use rust_contigs::{format_int, Assembler, AssemblerConfig, LogObserver};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")");

/// Assembles contigs from short reads with a de Bruijn graph.
#[derive(Parser, Debug)]
#[command(name = "rust_contigs", version = VERSION)]
struct Args {
    /// Reads to assemble (fasta or fastq, optionally gzipped)
    input: PathBuf,

    /// k-mer size. Graph nodes are (k-1)-mers
    #[arg(short, long = "kmer-size", default_value_t = 51)]
    k: usize,

    /// Directory the contigs are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Prefix of the output file name
    #[arg(long, default_value = "contigs")]
    prefix: String,

    /// Check the graph invariants after every phase
    #[arg(long)]
    check_invariants: bool,

    /// Print a histogram of the contig lengths
    #[arg(long)]
    histogram: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = AssemblerConfig {
        k: args.k,
        check_invariants: args.check_invariants,
    };
    config.validate()?;

    let start = Instant::now();
    let reads = read_sequences(&args.input)
        .with_context(|| format!("could not read {}", args.input.display()))?;
    info!("{} reads loaded in {:?}", format_int(reads.len()), start.elapsed());

    let start = Instant::now();
    let assembly = Assembler::new(config)
        .run(&reads, &mut LogObserver)
        .with_context(|| format!("assembly of {} failed", args.input.display()))?;
    eprintln!("Assembly done in {:?}", start.elapsed());
    eprintln!("{}", assembly.graph_stats);
    eprintln!("Contigs: {}", assembly.stats);

    if args.histogram {
        print_length_histogram(&assembly.lengths());
    }

    let path = save_assembly(&assembly, &args.output_dir, &args.prefix)
        .with_context(|| format!("could not write contigs to {}", args.output_dir.display()))?;
    println!("{}", path.display());
    Ok(())
}
