//! To load reads from fasta/fastq files (optionally compressed).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use needletail::errors::ParseErrorKind;
use needletail::{parse_fastx_reader, FastxReader};

use crate::AssemblyError;

/// Reads every sequence of a fasta or fastq file, in file order.
///
/// Bases are upper-cased and empty records are skipped. An empty file yields
/// no read rather than an error.
pub fn read_sequences(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>, AssemblyError> {
    read_sequences_from(File::open(path)?)
}

/// Same as [read_sequences], from any reader. Compressed input is detected.
pub fn read_sequences_from<R: Read + Send + 'static>(reader: R) -> Result<Vec<Vec<u8>>, AssemblyError> {
    match parse_fastx_reader(reader) {
        Ok(reader) => collect_sequences(reader),
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn collect_sequences(mut reader: Box<dyn FastxReader>) -> Result<Vec<Vec<u8>>, AssemblyError> {
    let mut sequences = Vec::new();
    let mut nb_empty = 0;
    while let Some(record) = reader.next() {
        let record = record?;
        let mut seq = record.seq().into_owned();
        if seq.is_empty() {
            nb_empty += 1;
            continue;
        }
        seq.make_ascii_uppercase();
        sequences.push(seq);
    }
    debug!("read {} sequences ({} empty records skipped)", sequences.len(), nb_empty);
    Ok(sequences)
}
