//! Column-indexed multiple sequence alignment.
//!
//! Rows keep their own length. A column past the end of a shorter row is an
//! **absent** cell (`None` from [`Alignment::cell`]), which is distinct from a
//! gap `-`. The width of the alignment is the length of its longest row.

use crate::data::iupac::GAP;
use crate::error::{PrimerError, Result};
use crate::iupac;
use crate::seqio::{self, FastaRecord};

/// One cell of the alignment matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cell {
    /// A nucleotide code.
    Base(u8),
    /// An alignment gap.
    Gap,
}

/// A multiple sequence alignment: one row per record.
#[derive(Clone, Debug)]
pub struct Alignment {
    ids: Vec<String>,
    rows: Vec<Vec<u8>>,
    width: usize,
}

impl Alignment {
    /// Build from parsed records, rejecting symbols outside `ACGTRYSWKMBDHVN-`.
    pub fn from_records(records: Vec<FastaRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(PrimerError::EmptyAlignment);
        }
        for r in &records {
            if let Some(column) = r.seq.iter().position(|&b| !iupac::is_alignment_symbol(b)) {
                return Err(PrimerError::InvalidAlignmentCharacter {
                    record: r.id.clone(),
                    column,
                    character: r.seq[column] as char,
                });
            }
        }
        let width = records.iter().map(|r| r.seq.len()).max().unwrap_or(0);
        let (ids, rows) = records.into_iter().map(|r| (r.id, r.seq)).unzip();
        Ok(Self { ids, rows, width })
    }

    /// Parse FASTA text into an alignment.
    ///
    /// ```
    /// let aln = entroprimer::alignment::Alignment::from_fasta_str(">a\nACGT\n>b\nAC\n").unwrap();
    /// assert_eq!((aln.n_rows(), aln.width()), (2, 4));
    /// assert!(aln.cell(1, 3).is_none());
    /// ```
    pub fn from_fasta_str(text: &str) -> Result<Self> {
        Self::from_records(seqio::parse_fasta_str(text)?)
    }

    /// Number of sequences.
    pub fn n_rows(&self) -> usize { self.rows.len() }

    /// Number of columns (longest row).
    pub fn width(&self) -> usize { self.width }

    /// Record identifiers in input order.
    pub fn ids(&self) -> &[String] { &self.ids }

    /// Raw rows in input order.
    pub fn rows(&self) -> &[Vec<u8>] { &self.rows }

    /// `true` if every row spans the full width.
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|r| r.len() == self.width)
    }

    /// The cell at `(row, column)`, or `None` when the row is too short.
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        self.rows.get(row)?.get(column).map(|&b| if b == GAP { Cell::Gap } else { Cell::Base(b) })
    }

    /// Shortest row length; columns before it are present in every row.
    pub(crate) fn min_row_len(&self) -> usize {
        self.rows.iter().map(Vec::len).min().unwrap_or(0)
    }
}
