//! Sliding-window Shannon entropy over alignment columns.
//!
//! For a window length `k` the scanner visits window starts `0, 1, 2, ...`
//! while `start + k < width`. Each window is either
//! - **halting**: some row ends inside the window; the scan for this `k` stops,
//! - **gapped**: some row has `-` inside the window; recorded as
//!   [`WindowStat::Gapped`] and skipped,
//! - **scored**: the entropy (natural log, in nats) of the distribution of the
//!   `k`-length words across rows, plus the degenerate consensus of the window.
//!
//! # Examples
//! ```
//! use entroprimer::{alignment::Alignment, entropy};
//! let aln = Alignment::from_fasta_str(">a\nACGTAC\n>b\nACGTAC\n").unwrap();
//! let curve = entropy::scan(&aln, 3).unwrap();
//! assert_eq!(curve.len(), 3);
//! assert_eq!(curve.entropy(0), Some(0.0));
//! assert_eq!(curve.consensus(0), Some("ACG"));
//! ```

use std::collections::HashMap;

use log::debug;

use crate::alignment::Alignment;
use crate::data::iupac::GAP;
use crate::error::{PrimerError, Result};
use crate::iupac;

/// Statistic recorded for one window start.
#[derive(Clone, Debug, PartialEq)]
pub enum WindowStat {
    /// At least one row has a gap inside the window.
    Gapped,
    /// Word entropy and degenerate consensus of a gap-free window.
    Scored { entropy: f64, consensus: String },
}

impl WindowStat {
    /// Entropy of a scored window.
    pub fn entropy(&self) -> Option<f64> {
        match self {
            WindowStat::Scored { entropy, .. } => Some(*entropy),
            WindowStat::Gapped => None,
        }
    }
}

/// Entropy curve for one window length. Index `i` is the window starting at column `i`.
#[derive(Clone, Debug)]
pub struct EntropyCurve {
    k: usize,
    windows: Vec<WindowStat>,
    halted_at: Option<usize>,
}

impl EntropyCurve {
    pub fn k(&self) -> usize { self.k }
    pub fn len(&self) -> usize { self.windows.len() }
    pub fn is_empty(&self) -> bool { self.windows.is_empty() }
    pub fn windows(&self) -> &[WindowStat] { &self.windows }

    /// Window start at which scanning stopped on a row that was too short, if any.
    pub fn halted_at(&self) -> Option<usize> { self.halted_at }

    pub fn entropy(&self, start: usize) -> Option<f64> {
        self.windows.get(start).and_then(WindowStat::entropy)
    }

    pub fn consensus(&self, start: usize) -> Option<&str> {
        match self.windows.get(start)? {
            WindowStat::Scored { consensus, .. } => Some(consensus.as_str()),
            WindowStat::Gapped => None,
        }
    }

    /// Entropy per window start, `None` for gapped windows.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.windows.iter().map(WindowStat::entropy).collect()
    }
}

/// Scan `aln` with windows of length `k`.
pub fn scan(aln: &Alignment, k: usize) -> Result<EntropyCurve> {
    if k == 0 {
        return Err(PrimerError::InvalidParameter("window length must be at least 1".into()));
    }
    let width = aln.width();
    let complete = aln.min_row_len();
    let mut windows = Vec::new();
    let mut halted_at = None;

    let mut start = 0usize;
    while start + k < width {
        let end = start + k;
        if end > complete {
            halted_at = Some(start);
            break;
        }
        if aln.rows().iter().any(|r| r[start..end].contains(&GAP)) {
            windows.push(WindowStat::Gapped);
            start += 1;
            continue;
        }
        let entropy = word_entropy(aln.rows().iter().map(|r| &r[start..end]));
        let consensus = consensus(aln, start, end)?;
        windows.push(WindowStat::Scored { entropy, consensus });
        start += 1;
    }
    debug!("k={k}: {} windows, halted_at={halted_at:?}", windows.len());
    Ok(EntropyCurve { k, windows, halted_at })
}

/// Shannon entropy (nats) of the empirical distribution of `words`.
pub fn word_entropy<'a, I>(words: I) -> f64
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut counts: HashMap<&[u8], usize> = HashMap::new();
    let mut n = 0usize;
    for w in words {
        *counts.entry(w).or_insert(0) += 1;
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    counts.values().map(|&c| {
        let p = c as f64 / n;
        p * (1.0 / p).ln()
    }).sum()
}

/// Degenerate consensus of columns `start..end`: per column, the IUPAC code
/// whose expansion is the union of the bases observed across rows.
pub fn consensus(aln: &Alignment, start: usize, end: usize) -> Result<String> {
    let mut out = String::with_capacity(end.saturating_sub(start));
    for column in start..end {
        let mut mask = 0u8;
        for (row, seq) in aln.rows().iter().enumerate() {
            let symbol = seq.get(column).copied().unwrap_or(GAP);
            let code = iupac::lookup(symbol).ok_or_else(|| PrimerError::InvalidAlignmentCharacter {
                record: aln.ids()[row].clone(),
                column,
                character: symbol as char,
            })?;
            mask |= code.mask;
        }
        let symbol = iupac::code_for_mask(mask).ok_or_else(|| PrimerError::InvalidAlignmentCharacter {
            record: aln.ids().first().cloned().unwrap_or_default(),
            column,
            character: '?',
        })?;
        out.push(symbol as char);
    }
    Ok(out)
}

#[cfg(test)]
mod entropy_tests {
    use super::*;

    fn aln(rows: &[&str]) -> Alignment {
        let text: String = rows.iter().enumerate().map(|(i, r)| format!(">s{i}\n{r}\n")).collect();
        Alignment::from_fasta_str(&text).unwrap()
    }

    #[test]
    fn identical_rows_give_a_flat_zero_curve() {
        let s = "ACGTACGTACGTACGTACGTACGTACGTAC";
        let curve = scan(&aln(&[s, s, s, s]), 18).unwrap();
        // starts 0..=11 satisfy start + 18 < 30
        assert_eq!(curve.len(), 12);
        assert!(curve.values().iter().all(|v| *v == Some(0.0)));
        assert_eq!(curve.consensus(0), Some(&s[..18]));
    }

    #[test]
    fn variable_column_raises_entropy_of_covering_windows() {
        let a = "AAAAACCCCCGGGGGTTTTT";
        let b = "AAAAACCCCGGGGGGTTTTT";
        let curve = scan(&aln(&[a, a, b, b]), 4).unwrap();
        // column 9 differs; windows 6..=9 cover it
        for start in 0..curve.len() {
            let e = curve.entropy(start).unwrap();
            if (6..=9).contains(&start) {
                assert!((e - 2f64.ln()).abs() < 1e-12);
                assert_eq!(curve.consensus(start).unwrap().as_bytes()[9 - start], b'S');
            } else {
                assert_eq!(e, 0.0);
            }
        }
    }

    #[test]
    fn gapped_windows_are_undefined_but_scanning_continues() {
        let curve = scan(&aln(&["ACGTACGTAC", "ACG-ACGTAC"]), 3).unwrap();
        assert_eq!(curve.len(), 7);
        for start in 1..=3 {
            assert_eq!(curve.windows()[start], WindowStat::Gapped);
        }
        assert_eq!(curve.entropy(0), Some(0.0));
        assert_eq!(curve.entropy(4), Some(0.0));
        assert!(curve.halted_at().is_none());
    }

    #[test]
    fn ragged_row_halts_the_scan() {
        let curve = scan(&aln(&["ACGTACGTAC", "ACGTAC"]), 3).unwrap();
        // windows 0..=3 fit in the short row; window 4 would need column 6
        assert_eq!(curve.len(), 4);
        assert_eq!(curve.halted_at(), Some(4));
    }

    #[test]
    fn entropy_of_uniform_words_is_log_n() {
        let words: Vec<&[u8]> = vec![b"AA", b"AC", b"AG", b"AT"];
        assert!((word_entropy(words) - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn consensus_unions_ambiguity_codes() {
        let a = aln(&["ARTN", "GATC"]);
        assert_eq!(consensus(&a, 0, 4).unwrap(), "RRTN");
    }

    #[test]
    fn zero_window_length_is_rejected() {
        assert!(matches!(scan(&aln(&["ACGT"]), 0), Err(PrimerError::InvalidParameter(_))));
    }
}
