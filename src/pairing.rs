//! Primer filtering and forward/reverse pairing.
//!
//! Primers are first screened individually against [`PairCriteria`]; every
//! unordered combination of the survivors is then tested against the amplicon
//! length window. The primer with the smaller start column is the forward
//! primer and the amplicon is the stretch between the end of the forward
//! primer and the start of the reverse primer.

use core::fmt;

use log::debug;

use crate::error::{PrimerError, Result};
use crate::outgroup::OutgroupDistances;
use crate::primer::Primer;

/// Thresholds applied by [`assemble_pairs`].
#[derive(Clone, Debug, PartialEq)]
pub struct PairCriteria {
    pub max_degeneracy: u32,
    pub min_melting_temp: f64,
    pub max_melting_temp: f64,
    /// Minimum GC fraction (`0.0..=1.0`).
    pub min_gc: f64,
    /// Maximum GC fraction (`0.0..=1.0`).
    pub max_gc: f64,
    /// Smallest accepted amplicon length.
    pub amp_min: usize,
    /// Largest accepted amplicon length.
    pub amp_max: usize,
    /// Keep only primers with a good GC clamp.
    pub select_gc_clamp: bool,
    /// Drop primers with a bad GC clamp.
    pub omit_gc_clamp: bool,
}

impl PairCriteria {
    /// `true` if `p` passes the per-primer thresholds and clamp rules.
    pub fn accepts(&self, p: &Primer) -> bool {
        let (tm_min, tm_max) = p.melting_temp_range();
        let (gc_min, gc_max) = p.gc_range();
        p.degeneracy() <= self.max_degeneracy
            && tm_max <= self.max_melting_temp
            && tm_min >= self.min_melting_temp
            && gc_min >= self.min_gc
            && gc_max <= self.max_gc
            && (!self.select_gc_clamp || p.good_gc_clamp())
            && (!self.omit_gc_clamp || !p.bad_gc_clamp())
    }

    fn accepts_amplicon(&self, len: i64) -> bool {
        self.amp_min as i64 <= len && len <= self.amp_max as i64
    }
}

/// A forward/reverse primer combination.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimerPair {
    forward: Primer,
    reverse: Primer,
    amplicon_length: i64,
    outgroup: Option<OutgroupDistances>,
}

impl PrimerPair {
    /// Pair two primers; the one starting first becomes the forward primer.
    pub fn new(a: Primer, b: Primer) -> Self {
        let (forward, reverse) = if b.pos() < a.pos() { (b, a) } else { (a, b) };
        let amplicon_length = amplicon_length(&forward, &reverse);
        Self { forward, reverse, amplicon_length, outgroup: None }
    }

    pub fn forward(&self) -> &Primer { &self.forward }
    pub fn reverse(&self) -> &Primer { &self.reverse }

    /// Columns between the end of the forward primer and the start of the reverse primer.
    /// Negative when the two primers overlap.
    pub fn amplicon_length(&self) -> i64 { self.amplicon_length }

    /// Outgroup distances measured by [`crate::outgroup::filter_pairs`], if screened.
    pub fn outgroup(&self) -> Option<&OutgroupDistances> { self.outgroup.as_ref() }

    pub(crate) fn with_outgroup(mut self, d: OutgroupDistances) -> Self {
        self.outgroup = Some(d);
        self
    }
}

fn amplicon_length(forward: &Primer, reverse: &Primer) -> i64 {
    reverse.pos() as i64 - (forward.pos() + forward.length()) as i64
}

impl fmt::Display for PrimerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, p) in [("Forward", &self.forward), ("Reverse", &self.reverse)] {
            let (tm_lo, tm_hi) = p.melting_temp_range();
            let (gc_lo, gc_hi) = p.gc_range();
            writeln!(f, "{label}:")?;
            writeln!(f, "    Seq: {}", p.seq())?;
            writeln!(f, "    Position: {}", p.pos())?;
            writeln!(f, "    Tm range: {tm_lo:.2} - {tm_hi:.2}")?;
            writeln!(f, "    Degeneracy: {}", p.degeneracy())?;
            writeln!(f, "    GC% range: {gc_lo:.3} - {gc_hi:.3}")?;
        }
        write!(f, "Amplicon length: {}", self.amplicon_length)?;
        if let Some(d) = &self.outgroup {
            write!(f, "\nOutgroup distance: forward {}, reverse {}", fmt_distance(d.forward), fmt_distance(d.reverse))?;
        }
        Ok(())
    }
}

fn fmt_distance(d: Option<usize>) -> String {
    d.map_or_else(|| "n/a".to_string(), |d| d.to_string())
}

/// Primers passing the per-primer thresholds, in input order.
pub fn filter_primers<'a>(primers: &'a [Primer], criteria: &PairCriteria) -> Vec<&'a Primer> {
    primers.iter().filter(|p| criteria.accepts(p)).collect()
}

/// Filter `primers` and pair the survivors whose amplicon length fits the window.
///
/// Fails with [`PrimerError::ResourceLimitExceeded`] once more than `max_pairs`
/// pairs have been accepted.
///
/// ```
/// use entroprimer::{primer::Primer, pairing::{assemble_pairs, PairCriteria}};
/// let c = PairCriteria {
///     max_degeneracy: 2, min_melting_temp: -1000.0, max_melting_temp: 1000.0,
///     min_gc: 0.0, max_gc: 1.0, amp_min: 5, amp_max: 10,
///     select_gc_clamp: false, omit_gc_clamp: false,
/// };
/// let primers = vec![
///     Primer::new("ACGTACGT", 30, None).unwrap(),
///     Primer::new("ACGTACGT", 0, None).unwrap(),
/// ];
/// let pairs = assemble_pairs(&primers, &c, 100).unwrap();
/// assert_eq!(pairs.len(), 0); // amplicon is 22
/// ```
pub fn assemble_pairs(primers: &[Primer], criteria: &PairCriteria, max_pairs: usize) -> Result<Vec<PrimerPair>> {
    let kept = filter_primers(primers, criteria);
    debug!("{} of {} primers pass thresholds", kept.len(), primers.len());
    let mut pairs = Vec::new();
    for (i, a) in kept.iter().enumerate() {
        for b in &kept[i + 1..] {
            let (forward, reverse) = if b.pos() < a.pos() { (*b, *a) } else { (*a, *b) };
            if !criteria.accepts_amplicon(amplicon_length(forward, reverse)) {
                continue;
            }
            if pairs.len() == max_pairs {
                return Err(PrimerError::ResourceLimitExceeded { what: "primer pair", limit: max_pairs, requested: pairs.len() as u128 + 1 });
            }
            pairs.push(PrimerPair::new(forward.clone(), reverse.clone()));
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod pairing_tests {
    use super::*;

    fn open() -> PairCriteria {
        PairCriteria {
            max_degeneracy: 10,
            min_melting_temp: f64::NEG_INFINITY,
            max_melting_temp: f64::INFINITY,
            min_gc: 0.0,
            max_gc: 1.0,
            amp_min: 0,
            amp_max: 1000,
            select_gc_clamp: false,
            omit_gc_clamp: false,
        }
    }

    fn p(seq: &str, pos: usize) -> Primer { Primer::new(seq, pos, None).unwrap() }

    #[test]
    fn forward_is_the_earlier_primer_regardless_of_input_order() {
        let primers = vec![p("GGGGAAAAAA", 50), p("CCCCAAAAAA", 10)];
        let pairs = assemble_pairs(&primers, &open(), 10).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].forward().pos(), 10);
        assert_eq!(pairs[0].reverse().pos(), 50);
        assert_eq!(pairs[0].amplicon_length(), 30);
    }

    #[test]
    fn amplicon_window_is_inclusive() {
        let primers: Vec<_> = [0, 85, 160, 161, 170].into_iter().map(|pos| p("AAAAAAAAAC", pos)).collect();
        let c = PairCriteria { amp_min: 75, amp_max: 150, ..open() };
        let pairs = assemble_pairs(&primers, &c, 10).unwrap();
        let spans: Vec<_> = pairs.iter().map(|q| (q.forward().pos(), q.reverse().pos(), q.amplicon_length())).collect();
        assert_eq!(spans, vec![(0, 85, 75), (0, 160, 150), (85, 170, 75)]);
        for q in &pairs {
            assert!(q.forward().pos() < q.reverse().pos());
            assert!((75..=150).contains(&q.amplicon_length()));
        }
    }

    #[test]
    fn overlapping_primers_are_never_paired() {
        let primers = vec![p("ACGTACGTAC", 0), p("ACGTACGTAC", 5), p("ACGTACGTAC", 5)];
        assert!(assemble_pairs(&primers, &open(), 10).unwrap().is_empty());
    }

    #[test]
    fn thresholds_filter_individual_primers() {
        let primers = vec![p("ACGTNNACGT", 0), p("ACGTACGTAC", 40), p("ACGTACGTAC", 80)];
        let c = PairCriteria { max_degeneracy: 2, ..open() };
        let kept = filter_primers(&primers, &c);
        assert_eq!(kept.len(), 2);
        let c = PairCriteria { min_gc: 0.6, ..open() };
        assert!(filter_primers(&primers, &c).is_empty());
        let c = PairCriteria { max_gc: 0.4, ..open() };
        assert!(filter_primers(&primers, &c).is_empty());
    }

    #[test]
    fn temperature_bounds_use_both_ends_of_the_range() {
        let q = Primer::new("RRRRRRRRRRRRRRRRRRRR", 0, Some(0.05)).unwrap();
        let (lo, hi) = q.melting_temp_range();
        assert!((lo - 40.0).abs() < 1e-9 && (hi - 80.0).abs() < 1e-9);
        let inside = PairCriteria { min_melting_temp: 39.5, max_melting_temp: 80.5, ..open() };
        assert!(inside.accepts(&q));
        let narrow = PairCriteria { min_melting_temp: 40.5, ..inside.clone() };
        assert!(!narrow.accepts(&q));
        let narrow = PairCriteria { max_melting_temp: 79.5, ..inside };
        assert!(!narrow.accepts(&q));
    }

    #[test]
    fn clamp_flags() {
        let good = p("AAAAAAAAAG", 0);
        let bad = p("AAAAAGGGGG", 50);
        let neither = p("AAAAAAAAAA", 100);
        let primers = vec![good.clone(), bad.clone(), neither.clone()];
        let select = PairCriteria { select_gc_clamp: true, ..open() };
        assert_eq!(filter_primers(&primers, &select), vec![&good]);
        let omit = PairCriteria { omit_gc_clamp: true, ..open() };
        assert_eq!(filter_primers(&primers, &omit), vec![&good, &neither]);
    }

    #[test]
    fn pair_cap_is_enforced() {
        let primers: Vec<_> = (0..5).map(|i| p("ACGTACGTAC", i * 20)).collect();
        assert_eq!(assemble_pairs(&primers, &open(), 10).unwrap().len(), 10);
        assert!(matches!(
            assemble_pairs(&primers, &open(), 9),
            Err(PrimerError::ResourceLimitExceeded { limit: 9, .. })
        ));
    }

    #[test]
    fn display_block() {
        let pair = PrimerPair::new(p("ACGT", 0), p("TTGG", 10));
        let s = pair.to_string();
        assert!(s.starts_with("Forward:\n    Seq: ACGT\n"));
        assert!(s.contains("Reverse:\n    Seq: TTGG\n"));
        assert!(s.ends_with("Amplicon length: 6"));
    }
}
