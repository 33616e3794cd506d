//! Primer discovery pipeline.
//!
//! alignment → entropy curve per window length → local minima → primers →
//! filtered pairs → outgroup screening.
//!
//! A run returns a fresh [`DiscoveryState`]; [`PrimerFinder`] itself holds only
//! the validated parameters and can be reused for any number of runs.
//!
//! # Examples
//! ```
//! use entroprimer::config::DiscoveryParams;
//! use entroprimer::finder::{DiscoveryOutcome, PrimerFinder};
//!
//! let seq = "ACGTACGTACGTACGTACGTACGTACGTAC";
//! let msa = format!(">a\n{seq}\n>b\n{seq}\n>c\n{seq}\n>d\n{seq}\n");
//! let params = DiscoveryParams { min_primer_len: 18, max_primer_len: 19, ..Default::default() };
//! let state = PrimerFinder::new(params).unwrap().discover_fasta(&msa, None).unwrap();
//! assert!(state.primers().is_empty());
//! assert!(matches!(state.into_outcome(), DiscoveryOutcome::NoResults));
//! ```

use log::{debug, info, warn};

use crate::alignment::Alignment;
use crate::config::DiscoveryParams;
use crate::entropy::{self, EntropyCurve};
use crate::error::Result;
use crate::outgroup::{self, Outgroup};
use crate::pairing::{self, PrimerPair};
use crate::peaks;
use crate::primer::Primer;

/// Entropy curve for one window length and its selected minima.
#[derive(Clone, Debug)]
pub struct KmerScan {
    pub curve: EntropyCurve,
    pub peaks: Vec<usize>,
}

/// Everything a discovery run produced.
#[derive(Clone, Debug)]
pub struct DiscoveryState {
    alignment: Alignment,
    scans: Vec<KmerScan>,
    primers: Vec<Primer>,
    pairs: Vec<PrimerPair>,
}

impl DiscoveryState {
    pub fn alignment(&self) -> &Alignment { &self.alignment }
    /// One scan per window length, shortest first.
    pub fn scans(&self) -> &[KmerScan] { &self.scans }
    /// Primers built from every minimum, before filtering.
    pub fn primers(&self) -> &[Primer] { &self.primers }
    /// Pairs that survived every filter.
    pub fn pairs(&self) -> &[PrimerPair] { &self.pairs }

    /// The caller-facing result of the run.
    pub fn into_outcome(self) -> DiscoveryOutcome {
        DiscoveryOutcome::from_pairs(self.pairs)
    }
}

/// Result of a discovery run. An empty pair list is always [`DiscoveryOutcome::NoResults`].
#[derive(Clone, Debug, PartialEq)]
pub enum DiscoveryOutcome {
    Pairs(Vec<PrimerPair>),
    NoResults,
}

impl DiscoveryOutcome {
    pub fn from_pairs(pairs: Vec<PrimerPair>) -> Self {
        if pairs.is_empty() { DiscoveryOutcome::NoResults } else { DiscoveryOutcome::Pairs(pairs) }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, DiscoveryOutcome::NoResults)
    }

    /// Accepted pairs; empty for [`DiscoveryOutcome::NoResults`].
    pub fn pairs(&self) -> &[PrimerPair] {
        match self {
            DiscoveryOutcome::Pairs(p) => p,
            DiscoveryOutcome::NoResults => &[],
        }
    }
}

/// Drives a discovery run with validated parameters.
#[derive(Clone, Debug)]
pub struct PrimerFinder {
    params: DiscoveryParams,
}

impl PrimerFinder {
    /// Validate `params` and build a finder.
    pub fn new(params: DiscoveryParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &DiscoveryParams { &self.params }

    /// Scan every window length in `[min_primer_len, max_primer_len)` and build
    /// one primer per local entropy minimum.
    pub fn identify_primers(&self, aln: &Alignment) -> Result<(Vec<KmerScan>, Vec<Primer>)> {
        let mut scans = Vec::new();
        let mut primers = Vec::new();
        for k in self.params.min_primer_len..self.params.max_primer_len {
            let curve = entropy::scan(aln, k)?;
            if let Some(start) = curve.halted_at() {
                warn!("k={k}: scan stopped at column {start}, a sequence ends before the alignment does");
            }
            let minima = peaks::find_minima(&curve);
            debug!("k={k}: {} windows, {} minima", curve.len(), minima.len());
            for &start in &minima {
                if let Some(seq) = curve.consensus(start) {
                    primers.push(Primer::new(seq, start, self.params.na_conc)?);
                }
            }
            scans.push(KmerScan { curve, peaks: minima });
        }
        info!("{} candidate primers over {} window lengths", primers.len(), scans.len());
        Ok((scans, primers))
    }

    /// Pair `primers` and screen the pairs against `outgroup`.
    pub fn identify_pairs(&self, primers: &[Primer], outgroup: &Outgroup) -> Result<Vec<PrimerPair>> {
        let p = &self.params;
        let pairs = pairing::assemble_pairs(primers, &p.pair_criteria(), p.limits.max_pairs)?;
        info!("{} primer pairs within amplicon bounds", pairs.len());
        if outgroup.is_empty() {
            return Ok(pairs);
        }
        let screened = outgroup::filter_pairs(pairs, outgroup, p.max_edit_distance, &p.limits)?;
        info!("{} primer pairs after screening against {} outgroup sequences", screened.len(), outgroup.len());
        Ok(screened)
    }

    /// Run the full pipeline on parsed inputs.
    pub fn discover(&self, alignment: Alignment, outgroup: &Outgroup) -> Result<DiscoveryState> {
        info!("alignment: {} sequences x {} columns", alignment.n_rows(), alignment.width());
        let (scans, primers) = self.identify_primers(&alignment)?;
        let pairs = self.identify_pairs(&primers, outgroup)?;
        Ok(DiscoveryState { alignment, scans, primers, pairs })
    }

    /// Parse FASTA inputs, then run the full pipeline.
    ///
    /// Both inputs are parsed and checked before any scanning starts.
    pub fn discover_fasta(&self, msa: &str, outgroup: Option<&str>) -> Result<DiscoveryState> {
        let alignment = Alignment::from_fasta_str(msa)?;
        let outgroup = match outgroup {
            Some(text) => Outgroup::from_fasta_str(text)?,
            None => Outgroup::default(),
        };
        self.discover(alignment, &outgroup)
    }
}

/// One-shot discovery: validate, parse, run and return the outcome.
pub fn find_primer_pairs(msa: &str, outgroup: Option<&str>, params: &DiscoveryParams) -> Result<DiscoveryOutcome> {
    Ok(PrimerFinder::new(params.clone())?.discover_fasta(msa, outgroup)?.into_outcome())
}
