//! FASTA input for alignments and outgroups.
//!
//! ### Design
//! - Parsing is delegated to `needletail`, which strips line breaks and
//!   transparently handles compressed files.
//! - Records are normalised to upper case; alphabet checks are left to the
//!   consumers ([`crate::alignment`] and [`crate::outgroup`]) because the two
//!   inputs accept different alphabets.
//! - Empty or whitespace-only text is zero records, not an error.
//!
//! ### Example
//! ```
//! use entroprimer::seqio;
//! let recs = seqio::parse_fasta_str(">a\nAC\nGT\n>b\nacgt\n").unwrap();
//! assert_eq!(recs.len(), 2);
//! assert_eq!(recs[1].seq, b"ACGT");
//! ```

use std::io::Cursor;
use std::path::Path;

use needletail::{parse_fastx_file, parse_fastx_reader};

use crate::error::{PrimerError, Result};

/// A normalised FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Parse FASTA text held in memory. Blank lines before the first header are skipped.
pub fn parse_fasta_str(text: &str) -> Result<Vec<FastaRecord>> {
    let text = text.trim_start();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let reader = parse_fastx_reader(Cursor::new(text.as_bytes().to_vec()))
        .map_err(|e| PrimerError::MalformedFasta(e.to_string()))?;
    collect_records(reader)
}

/// Parse a FASTA file (optionally gzip/bzip2/xz compressed).
pub fn read_fasta_path<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
    let p = path.as_ref();
    if std::fs::metadata(p)?.len() == 0 {
        return Ok(Vec::new());
    }
    let reader = parse_fastx_file(p).map_err(|e| PrimerError::MalformedFasta(format!("{}: {e}", p.display())))?;
    collect_records(reader)
}

fn collect_records(mut reader: Box<dyn needletail::FastxReader>) -> Result<Vec<FastaRecord>> {
    let mut out = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record.map_err(|e| PrimerError::MalformedFasta(e.to_string()))?;
        let id = String::from_utf8_lossy(rec.id()).to_string();
        let mut seq = rec.seq().to_vec();
        seq.make_ascii_uppercase();
        out.push(FastaRecord { id, seq });
    }
    Ok(out)
}
