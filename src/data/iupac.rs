//! IUPAC nucleotide ambiguity codes (NC-IUB 1984 recommendations).
//!
//! One record per symbol. Every per-symbol rule used by the crate is read from
//! this table: the expansion set, the 4-bit base mask used to build consensus
//! codes, the degeneracy weight and the GC-minimising / GC-maximising
//! representative bases used to bound melting temperature and GC content.
//!
//! Base masks: `A = 0b0001`, `C = 0b0010`, `G = 0b0100`, `T = 0b1000`.

use crate::iupac::NucleotideCode;

/// All fifteen nucleotide codes, unambiguous bases first.
pub const CODES: &[NucleotideCode] = &[
    NucleotideCode { symbol: b'A', bases: b"A", mask: 0b0001, degeneracy: 0, min_gc: b'A', max_gc: b'A' },
    NucleotideCode { symbol: b'C', bases: b"C", mask: 0b0010, degeneracy: 0, min_gc: b'C', max_gc: b'C' },
    NucleotideCode { symbol: b'G', bases: b"G", mask: 0b0100, degeneracy: 0, min_gc: b'G', max_gc: b'G' },
    NucleotideCode { symbol: b'T', bases: b"T", mask: 0b1000, degeneracy: 0, min_gc: b'T', max_gc: b'T' },
    // two-base codes
    NucleotideCode { symbol: b'R', bases: b"AG", mask: 0b0101, degeneracy: 1, min_gc: b'A', max_gc: b'G' },
    NucleotideCode { symbol: b'M', bases: b"AC", mask: 0b0011, degeneracy: 1, min_gc: b'A', max_gc: b'C' },
    NucleotideCode { symbol: b'W', bases: b"AT", mask: 0b1001, degeneracy: 1, min_gc: b'A', max_gc: b'A' },
    NucleotideCode { symbol: b'S', bases: b"CG", mask: 0b0110, degeneracy: 1, min_gc: b'C', max_gc: b'G' },
    NucleotideCode { symbol: b'K', bases: b"GT", mask: 0b1100, degeneracy: 1, min_gc: b'T', max_gc: b'G' },
    NucleotideCode { symbol: b'Y', bases: b"CT", mask: 0b1010, degeneracy: 1, min_gc: b'T', max_gc: b'C' },
    // three-base codes
    NucleotideCode { symbol: b'V', bases: b"ACG", mask: 0b0111, degeneracy: 2, min_gc: b'A', max_gc: b'G' },
    NucleotideCode { symbol: b'D', bases: b"AGT", mask: 0b1101, degeneracy: 2, min_gc: b'A', max_gc: b'G' },
    NucleotideCode { symbol: b'H', bases: b"ACT", mask: 0b1011, degeneracy: 2, min_gc: b'A', max_gc: b'C' },
    NucleotideCode { symbol: b'B', bases: b"CGT", mask: 0b1110, degeneracy: 2, min_gc: b'T', max_gc: b'G' },
    // any base
    NucleotideCode { symbol: b'N', bases: b"ACGT", mask: 0b1111, degeneracy: 3, min_gc: b'A', max_gc: b'G' },
];

/// Alignment gap symbol. Not a nucleotide code; windows containing it are skipped.
pub const GAP: u8 = b'-';
