//! To write contigs as fasta.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::assembler::{Assembly, Contig};
use crate::{format_int, AssemblyError};

/// Writes one fasta record per contig, headed `>contig_<i> k=<k> len=<len>`.
pub fn write_contigs<W: Write>(writer: &mut W, contigs: &[Contig], k: usize) -> std::io::Result<()> {
    for (i, contig) in contigs.iter().enumerate() {
        writeln!(writer, ">contig_{} k={} len={}", i, k, contig.len())?;
        writer.write_all(contig)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Name of the output file, e.g. `contigs_k31_n50_1234.fasta`.
pub fn output_path(dir: impl AsRef<Path>, prefix: &str, k: usize, n50: i64) -> PathBuf {
    dir.as_ref().join(format!("{}_k{}_n50_{}.fasta", prefix, k, n50))
}

/// Saves the contigs of an assembly in `dir`, creating it if needed.
/// Returns the path of the written file.
pub fn save_assembly(assembly: &Assembly, dir: impl AsRef<Path>, prefix: &str) -> Result<PathBuf, AssemblyError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = output_path(dir, prefix, assembly.k, assembly.n50);

    let mut writer = BufWriter::new(File::create(&path)?);
    write_contigs(&mut writer, &assembly.contigs, assembly.k)?;
    writer.flush()?;

    info!(
        "{} contigs written to {}",
        format_int(assembly.contigs.len()),
        path.display()
    );
    Ok(path)
}
