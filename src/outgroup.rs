//! Outgroup screening of primer pairs.
//!
//! For every primer the minimum Levenshtein distance between any of its
//! concrete variants and any same-length window of any outgroup sequence is
//! measured. A pair is kept when at least one of its primers has a minimum
//! distance below `max_edit_dist`; a primer the outgroup offers no window for
//! never satisfies that test.
//!
//! ### Performance
//! - distances depend only on the primer sequence, so each distinct sequence
//!   is measured once and shared by every pair using it,
//! - an Aho–Corasick automaton over the variants finds exact occurrences
//!   (distance 0) without running the quadratic distance,
//! - sequences are measured in parallel on a local rayon pool; the output keeps
//!   the input order of the pairs.

use std::collections::HashMap;

use aho_corasick::AhoCorasick;
use bio::alignment::distance::levenshtein;
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::config::Limits;
use crate::error::{PrimerError, Result};
use crate::iupac;
use crate::pairing::PrimerPair;
use crate::primer::Primer;
use crate::seqio::{self, FastaRecord};

/// Minimum outgroup distances of the two primers of a pair.
///
/// `None` means the outgroup offered no window of the primer's length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OutgroupDistances {
    pub forward: Option<usize>,
    pub reverse: Option<usize>,
}

impl OutgroupDistances {
    /// `true` when either primer comes within fewer than `max_edit_dist` edits
    /// of some outgroup window.
    pub fn is_kept(&self, max_edit_dist: usize) -> bool {
        let near = |d: Option<usize>| d.is_some_and(|d| d < max_edit_dist);
        near(self.forward) || near(self.reverse)
    }
}

/// Outgroup sequences a primer should not match.
#[derive(Clone, Debug, Default)]
pub struct Outgroup {
    records: Vec<FastaRecord>,
}

impl Outgroup {
    /// Build from parsed records; gaps and non-IUPAC symbols are rejected.
    pub fn from_records(records: Vec<FastaRecord>) -> Result<Self> {
        for r in &records {
            if let Some(position) = r.seq.iter().position(|&b| iupac::lookup(b).is_none()) {
                return Err(PrimerError::InvalidOutgroupCharacter {
                    record: r.id.clone(),
                    position,
                    character: r.seq[position] as char,
                });
            }
        }
        Ok(Self { records })
    }

    pub fn from_fasta_str(text: &str) -> Result<Self> {
        Self::from_records(seqio::parse_fasta_str(text)?)
    }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn records(&self) -> &[FastaRecord] { &self.records }
}

/// Minimum distance between `variants` (all of one length) and any window of `outgroup`.
pub fn variants_distance(variants: &[Vec<u8>], outgroup: &Outgroup) -> Result<Option<usize>> {
    let Some(k) = variants.first().map(Vec::len) else { return Ok(None) };
    let exact = AhoCorasick::new(variants)?;
    let mut best: Option<usize> = None;
    for rec in outgroup.records() {
        if rec.seq.len() < k {
            continue;
        }
        if exact.is_match(&rec.seq) {
            return Ok(Some(0));
        }
        for window in rec.seq.windows(k) {
            for v in variants {
                let d = levenshtein(v, window) as usize;
                if best.map_or(true, |b| d < b) {
                    best = Some(d);
                }
            }
        }
    }
    Ok(best)
}

/// Minimum outgroup distance of one primer over all of its variants.
pub fn primer_distance(primer: &Primer, outgroup: &Outgroup, limits: &Limits) -> Result<Option<usize>> {
    variants_distance(&primer.expand(limits.max_variants)?, outgroup)
}

/// Keep the pairs with at least one primer fewer than `max_edit_dist` edits
/// from some outgroup window. An empty outgroup keeps every pair unchanged.
pub fn filter_pairs(
    pairs: Vec<PrimerPair>,
    outgroup: &Outgroup,
    max_edit_dist: usize,
    limits: &Limits,
) -> Result<Vec<PrimerPair>> {
    if outgroup.is_empty() {
        return Ok(pairs);
    }

    let mut unique: Vec<&Primer> = pairs.iter().flat_map(|p| [p.forward(), p.reverse()]).collect();
    unique.sort_by(|a, b| a.seq().cmp(b.seq()));
    unique.dedup_by(|a, b| a.seq() == b.seq());

    // Expansion happens up front so a variant-limit error surfaces before any distance work.
    let expanded = unique
        .iter()
        .map(|p| -> Result<(String, Vec<Vec<u8>>)> { Ok((p.seq().to_string(), p.expand(limits.max_variants)?)) })
        .collect::<Result<Vec<_>>>()?;

    let n = limits.threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
    let distances: HashMap<String, Option<usize>> = pool.install(|| {
        expanded
            .par_iter()
            .map(|(seq, variants)| -> Result<(String, Option<usize>)> {
                let d = variants_distance(variants, outgroup)?;
                debug!("outgroup distance {seq}: {d:?}");
                Ok((seq.clone(), d))
            })
            .collect::<Result<HashMap<_, _>>>()
    })?;

    Ok(pairs
        .into_iter()
        .filter_map(|pair| {
            let d = OutgroupDistances {
                forward: distances.get(pair.forward().seq()).copied().flatten(),
                reverse: distances.get(pair.reverse().seq()).copied().flatten(),
            };
            d.is_kept(max_edit_dist).then(|| pair.with_outgroup(d))
        })
        .collect())
}

#[cfg(test)]
mod outgroup_tests {
    use super::*;

    fn p(seq: &str, pos: usize) -> Primer { Primer::new(seq, pos, None).unwrap() }

    fn limits(threads: usize) -> Limits {
        Limits { threads: Some(threads), ..Limits::default() }
    }

    #[test]
    fn nearest_window_distance() {
        let og = Outgroup::from_fasta_str(">o\nTTACCTTT\n").unwrap();
        assert_eq!(primer_distance(&p("ACGT", 0), &og, &limits(1)).unwrap(), Some(1));
    }

    #[test]
    fn last_window_is_compared() {
        let og = Outgroup::from_fasta_str(">o\nTTTTTTACGA\n").unwrap();
        assert_eq!(primer_distance(&p("ACGA", 0), &og, &limits(1)).unwrap(), Some(0));
    }

    #[test]
    fn degenerate_primer_matches_through_a_variant() {
        let og = Outgroup::from_fasta_str(">o\nGGACGTGG\n").unwrap();
        assert_eq!(primer_distance(&p("ACGN", 0), &og, &limits(1)).unwrap(), Some(0));
        assert_eq!(primer_distance(&p("ACGR", 0), &og, &limits(1)).unwrap(), Some(1));
    }

    #[test]
    fn minimum_is_taken_across_outgroup_sequences() {
        let og = Outgroup::from_fasta_str(">a\nTTTTTTTT\n>b\nACGAAAAA\n").unwrap();
        assert_eq!(primer_distance(&p("ACGT", 0), &og, &limits(1)).unwrap(), Some(1));
    }

    #[test]
    fn short_outgroup_offers_no_window() {
        let og = Outgroup::from_fasta_str(">o\nACG\n").unwrap();
        assert_eq!(primer_distance(&p("ACGT", 0), &og, &limits(1)).unwrap(), None);
        assert!(!OutgroupDistances { forward: None, reverse: None }.is_kept(2));
        assert!(!OutgroupDistances { forward: None, reverse: Some(2) }.is_kept(2));
        assert!(OutgroupDistances { forward: None, reverse: Some(1) }.is_kept(2));
    }

    #[test]
    fn verbatim_forward_keeps_the_pair() {
        let fwd = "ACGTACGTAC";
        let og = Outgroup::from_fasta_str(&format!(">o\nGGGG{fwd}GGGGTTTTTTTTTT\n")).unwrap();
        let pair = PrimerPair::new(p(fwd, 0), p("CACACACACA", 30));
        let kept = filter_pairs(vec![pair], &og, 1, &limits(2)).unwrap();
        assert_eq!(kept.len(), 1);
        let d = kept[0].outgroup().unwrap();
        assert_eq!(d.forward, Some(0));
        assert!(d.reverse.unwrap() >= 1);
    }

    #[test]
    fn pair_far_from_the_outgroup_on_both_sides_is_dropped() {
        let og = Outgroup::from_fasta_str(">o\nTTTTTTTTTTTTTTTTTTTT\n").unwrap();
        let far = PrimerPair::new(p("GCGCGCGCGC", 0), p("CGCGCGCGCG", 30));
        let near = PrimerPair::new(p("GCGCGCGCGC", 0), p("TTTTTTTTTA", 30));
        let kept = filter_pairs(vec![far, near], &og, 2, &limits(1)).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].reverse().seq(), "TTTTTTTTTA");
        assert_eq!(kept[0].outgroup().unwrap().reverse, Some(1));
        assert_eq!(kept[0].outgroup().unwrap().forward, Some(10));
    }

    #[test]
    fn pair_with_no_outgroup_window_is_dropped() {
        let og = Outgroup::from_fasta_str(">o\nACGTA\n").unwrap();
        let pair = PrimerPair::new(p("ACGTACGTAC", 0), p("CACACACACA", 30));
        assert!(filter_pairs(vec![pair], &og, 2, &limits(1)).unwrap().is_empty());
    }

    #[test]
    fn empty_outgroup_is_a_pass_through() {
        let pairs = vec![PrimerPair::new(p("ACGT", 0), p("TTGG", 10))];
        let kept = filter_pairs(pairs.clone(), &Outgroup::default(), 5, &limits(1)).unwrap();
        assert_eq!(kept, pairs);
        assert!(kept[0].outgroup().is_none());
    }

    #[test]
    fn filtering_is_idempotent_and_thread_independent() {
        let og = Outgroup::from_fasta_str(">o\nACGTTGCAACGTAGGCTAGCTAGGATCCA\n").unwrap();
        let seqs = ["ACGTTG", "GCTAGC", "TTTTTT", "GGATCC", "CCCCCC"];
        let primers: Vec<_> = seqs.iter().enumerate().map(|(i, s)| p(s, i * 20)).collect();
        let mut pairs = Vec::new();
        for i in 0..primers.len() {
            for j in i + 1..primers.len() {
                pairs.push(PrimerPair::new(primers[i].clone(), primers[j].clone()));
            }
        }
        let once = filter_pairs(pairs.clone(), &og, 2, &limits(1)).unwrap();
        let parallel = filter_pairs(pairs, &og, 2, &limits(4)).unwrap();
        assert_eq!(once, parallel);
        let twice = filter_pairs(once.clone(), &og, 2, &limits(3)).unwrap();
        assert_eq!(once, twice);
        assert!(!once.is_empty());
        for pair in &once {
            assert!(pair.outgroup().unwrap().is_kept(2));
        }
    }

    #[test]
    fn variant_cap_aborts_screening() {
        let og = Outgroup::from_fasta_str(">o\nACGTACGTACGT\n").unwrap();
        let pairs = vec![PrimerPair::new(p("NNNNNN", 0), p("ACGTAC", 20))];
        let tight = Limits { max_variants: 100, ..limits(1) };
        assert!(matches!(
            filter_pairs(pairs, &og, 2, &tight),
            Err(PrimerError::ResourceLimitExceeded { .. })
        ));
    }

    #[test]
    fn gaps_in_outgroup_are_rejected() {
        assert!(matches!(
            Outgroup::from_fasta_str(">o\nAC-GT\n"),
            Err(PrimerError::InvalidOutgroupCharacter { position: 2, .. })
        ));
    }
}
