//! Lookups over the IUPAC nucleotide table in [`crate::data::iupac`].
//!
//! Symbol and base-set indexes are built at compile time, so every lookup is a
//! single array access.
//!
//! # Examples
//! ```
//! use entroprimer::iupac;
//! assert_eq!(iupac::expand(b'R'), Some(&b"AG"[..]));
//! assert_eq!(iupac::code_for_mask(0b0110), Some(b'S'));
//! assert!(iupac::lookup(b'X').is_none());
//! ```

use crate::data::iupac::{CODES, GAP};

/// One IUPAC nucleotide code and the rules derived from it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NucleotideCode {
    /// Upper-case symbol (e.g. `b'R'`).
    pub symbol: u8,
    /// Concrete bases the symbol stands for, in `ACGT` order.
    pub bases: &'static [u8],
    /// Bit set of [`NucleotideCode::bases`] (`A=1, C=2, G=4, T=8`).
    pub mask: u8,
    /// Degeneracy weight contributed by one occurrence of the symbol.
    pub degeneracy: u32,
    /// Representative base minimising GC content.
    pub min_gc: u8,
    /// Representative base maximising GC content.
    pub max_gc: u8,
}

const NONE: u8 = u8::MAX;

const fn index_by_symbol() -> [u8; 256] {
    let mut out = [NONE; 256];
    let mut i = 0;
    while i < CODES.len() {
        out[CODES[i].symbol as usize] = i as u8;
        i += 1;
    }
    out
}

const fn index_by_mask() -> [u8; 16] {
    let mut out = [NONE; 16];
    let mut i = 0;
    while i < CODES.len() {
        out[CODES[i].mask as usize] = i as u8;
        i += 1;
    }
    out
}

static BY_SYMBOL: [u8; 256] = index_by_symbol();
static BY_MASK: [u8; 16] = index_by_mask();

/// Return the code record for an upper-case symbol.
#[inline]
pub fn lookup(symbol: u8) -> Option<&'static NucleotideCode> {
    match BY_SYMBOL[symbol as usize] {
        NONE => None,
        i => Some(&CODES[i as usize]),
    }
}

/// Concrete bases represented by `symbol`.
#[inline]
pub fn expand(symbol: u8) -> Option<&'static [u8]> {
    lookup(symbol).map(|c| c.bases)
}

/// The code whose expansion is exactly the base set `mask`.
///
/// Returns `None` for the empty set and for masks wider than four bits.
#[inline]
pub fn code_for_mask(mask: u8) -> Option<u8> {
    if mask as usize >= BY_MASK.len() {
        return None;
    }
    match BY_MASK[mask as usize] {
        NONE => None,
        i => Some(CODES[i as usize].symbol),
    }
}

/// `true` for any nucleotide code or the alignment gap `-`.
#[inline]
pub fn is_alignment_symbol(symbol: u8) -> bool {
    symbol == GAP || lookup(symbol).is_some()
}

/// `true` for an unambiguous `G` or `C`.
#[inline]
pub fn is_gc_base(base: u8) -> bool {
    matches!(base, b'G' | b'C')
}

#[cfg(test)]
mod iupac_tests {
    use super::*;

    #[test]
    fn masks_match_expansions() {
        for c in CODES {
            let m = c.bases.iter().fold(0u8, |acc, b| acc | lookup(*b).unwrap().mask);
            assert_eq!(m, c.mask, "mask of {}", c.symbol as char);
        }
    }

    #[test]
    fn every_nonempty_base_set_has_a_code() {
        for mask in 1u8..16 {
            let sym = code_for_mask(mask).expect("code for mask");
            assert_eq!(lookup(sym).unwrap().mask, mask);
        }
        assert_eq!(code_for_mask(0), None);
        assert_eq!(code_for_mask(16), None);
    }

    #[test]
    fn degeneracy_weights() {
        let weight = |s: u8| lookup(s).unwrap().degeneracy;
        for s in *b"ACGT" { assert_eq!(weight(s), 0); }
        for s in *b"RMWSKY" { assert_eq!(weight(s), 1); }
        for s in *b"VDHB" { assert_eq!(weight(s), 2); }
        assert_eq!(weight(b'N'), 3);
    }

    #[test]
    fn representatives_are_members_and_ordered_by_gc() {
        for c in CODES {
            assert!(c.bases.contains(&c.min_gc), "{}", c.symbol as char);
            assert!(c.bases.contains(&c.max_gc), "{}", c.symbol as char);
            assert!(is_gc_base(c.min_gc) <= is_gc_base(c.max_gc));
        }
        assert_eq!(lookup(b'W').unwrap().max_gc, b'A');
        assert_eq!(lookup(b'S').unwrap().min_gc, b'C');
    }

    #[test]
    fn alphabet_membership() {
        for s in b"ACGTRYSWKMBDHVN-" { assert!(is_alignment_symbol(*s)); }
        for s in b"acgtXU*. " { assert!(!is_alignment_symbol(*s)); }
    }
}
