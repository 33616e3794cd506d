//! Degenerate primer model.
//!
//! A [`Primer`] is built once from a degenerate (IUPAC) sequence and its start
//! column in the alignment. Every derived attribute is computed at construction
//! from the per-symbol rules in [`crate::data::iupac`]:
//!
//! - **degeneracy**: sum of per-symbol weights (`R,M,W,S,K,Y` = 1, `V,D,H,B` = 2, `N` = 3),
//! - **GC range**: GC fraction of the GC-minimising and GC-maximising concrete sequences,
//! - **Tm range**: melting temperature of the same two sequences, salt-adjusted when a
//!   sodium concentration is given, the Wallace-style estimate otherwise,
//! - **GC clamp**: literal `G`, `C` or `S` among the last five symbols; 1–2 is a good
//!   clamp, more than 3 a bad one.
//!
//! # Examples
//! ```
//! use entroprimer::primer::Primer;
//! let p = Primer::new("ACGTN", 0, None).unwrap();
//! assert_eq!(p.degeneracy(), 3);
//! assert!(p.good_gc_clamp());
//! assert_eq!(p.variant_count(), 4);
//! ```

use core::fmt;

use crate::error::{PrimerError, Result};
use crate::iupac::{self, NucleotideCode};

/// Reference monovalent salt concentration (molar) of the salt-adjusted formula.
pub const REFERENCE_NA_MOLAR: f64 = 0.05;

/// Number of 3' symbols inspected for the GC clamp.
pub const CLAMP_WINDOW: usize = 5;

/// An immutable degenerate primer candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct Primer {
    seq: String,
    pos: usize,
    na_conc: Option<f64>,
    degeneracy: u32,
    gc_range: (f64, f64),
    melting_temp_range: (f64, f64),
    good_gc_clamp: bool,
    bad_gc_clamp: bool,
}

impl Primer {
    /// Build a primer from a degenerate sequence starting at alignment column `pos`.
    ///
    /// `na_conc` is the molar Na+ concentration; `None` selects the salt-free estimate.
    /// A concentration that is not a positive finite number is rejected.
    pub fn new(seq: impl Into<String>, pos: usize, na_conc: Option<f64>) -> Result<Self> {
        let seq = seq.into();
        if let Some(na) = na_conc {
            if !(na.is_finite() && na > 0.0) {
                return Err(PrimerError::InvalidParameter(format!("na_conc must be a positive number, got {na}")));
            }
        }
        if seq.is_empty() {
            return Err(PrimerError::InvalidPrimer { sequence: seq, reason: "empty sequence" });
        }
        let codes = seq
            .bytes()
            .map(iupac::lookup)
            .collect::<Option<Vec<&NucleotideCode>>>()
            .ok_or_else(|| PrimerError::InvalidPrimer { sequence: seq.clone(), reason: "symbol outside the IUPAC nucleotide alphabet" })?;

        let degeneracy = codes.iter().map(|c| c.degeneracy).sum();
        let min_seq: Vec<u8> = codes.iter().map(|c| c.min_gc).collect();
        let max_seq: Vec<u8> = codes.iter().map(|c| c.max_gc).collect();
        let gc_range = (gc_fraction(&min_seq), gc_fraction(&max_seq));
        let melting_temp_range = (melting_temp(&min_seq, na_conc), melting_temp(&max_seq, na_conc));

        let tail = &seq.as_bytes()[seq.len().saturating_sub(CLAMP_WINDOW)..];
        let clamp = tail.iter().filter(|&&b| matches!(b, b'G' | b'C' | b'S')).count();

        Ok(Self {
            pos,
            na_conc,
            degeneracy,
            gc_range,
            melting_temp_range,
            good_gc_clamp: clamp == 1 || clamp == 2,
            bad_gc_clamp: clamp > 3,
            seq,
        })
    }

    /// Degenerate sequence.
    pub fn seq(&self) -> &str { &self.seq }
    /// Start column in the alignment.
    pub fn pos(&self) -> usize { self.pos }
    pub fn length(&self) -> usize { self.seq.len() }
    pub fn na_conc(&self) -> Option<f64> { self.na_conc }
    pub fn degeneracy(&self) -> u32 { self.degeneracy }
    /// `(min, max)` GC fraction in `[0, 1]`.
    pub fn gc_range(&self) -> (f64, f64) { self.gc_range }
    /// `(min, max)` melting temperature in °C.
    pub fn melting_temp_range(&self) -> (f64, f64) { self.melting_temp_range }
    pub fn good_gc_clamp(&self) -> bool { self.good_gc_clamp }
    pub fn bad_gc_clamp(&self) -> bool { self.bad_gc_clamp }

    /// Number of concrete sequences the pattern stands for (saturating).
    pub fn variant_count(&self) -> u128 {
        self.seq.bytes().fold(1u128, |acc, b| {
            let n = iupac::expand(b).map_or(1, <[u8]>::len) as u128;
            acc.saturating_mul(n)
        })
    }

    /// Every concrete sequence consistent with the pattern, first position varying slowest.
    ///
    /// Fails with [`PrimerError::ResourceLimitExceeded`] when more than
    /// `max_variants` sequences would be produced.
    pub fn expand(&self, max_variants: usize) -> Result<Vec<Vec<u8>>> {
        let requested = self.variant_count();
        if requested > max_variants as u128 {
            return Err(PrimerError::ResourceLimitExceeded { what: "primer variant", limit: max_variants, requested });
        }
        let mut variants: Vec<Vec<u8>> = vec![Vec::with_capacity(self.length())];
        for b in self.seq.bytes() {
            let bases = iupac::expand(b).unwrap_or_default();
            variants = variants
                .iter()
                .flat_map(|prefix| bases.iter().map(move |&base| {
                    let mut v = prefix.clone();
                    v.push(base);
                    v
                }))
                .collect();
        }
        Ok(variants)
    }
}

impl fmt::Display for Primer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.seq) }
}

fn gc_count(seq: &[u8]) -> usize {
    seq.iter().filter(|&&b| iupac::is_gc_base(b)).count()
}

/// GC fraction of a concrete sequence.
pub fn gc_fraction(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    gc_count(seq) as f64 / seq.len() as f64
}

/// Melting temperature (°C) of a concrete sequence.
///
/// With a sodium concentration: `2(A+T) + 4(G+C) - 16.6 log10(0.05) + 16.6 log10(Na)`.
/// Without: `64.9 + 41 (G+C - 16.4) / length`.
pub fn melting_temp(seq: &[u8], na_conc: Option<f64>) -> f64 {
    let gc = gc_count(seq) as f64;
    let at = seq.iter().filter(|&&b| matches!(b, b'A' | b'T')).count() as f64;
    match na_conc {
        Some(na) => 2.0 * at + 4.0 * gc - 16.6 * REFERENCE_NA_MOLAR.log10() + 16.6 * na.log10(),
        None => 64.9 + 41.0 * (gc - 16.4) / seq.len() as f64,
    }
}
