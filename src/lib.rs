#![forbid(unsafe_code)]
//! # entroprimer
//!
//! Degenerate PCR primer discovery from a **multiple sequence alignment**.
//!
//! Conserved binding sites are located as local minima of the Shannon entropy
//! of `k`-length words across the aligned sequences. Each site becomes a
//! degenerate (IUPAC) primer, scored for degeneracy, melting temperature,
//! GC content and 3' GC clamp. Primers are paired into amplicons of bounded
//! length and, optionally, screened against an outgroup by edit distance.
//!
//! ## Pipeline
//! 1. [`alignment`]: FASTA → column-indexed matrix (ragged rows allowed).
//! 2. [`entropy`]: sliding-window word entropy and degenerate consensus per `k`.
//! 3. [`peaks`]: strict local minima of each entropy curve.
//! 4. [`primer`]: degeneracy, Tm range, GC range, GC clamp, variant expansion.
//! 5. [`pairing`]: per-primer thresholds and amplicon-length pairing.
//! 6. [`outgroup`]: keep pairs with at least one primer near the outgroup.
//!
//! [`finder::PrimerFinder`] drives the stages and returns a
//! [`finder::DiscoveryState`]; an empty result is the distinguished
//! [`finder::DiscoveryOutcome::NoResults`], never an error.
//!
//! ## Examples
//! ```rust
//! use entroprimer::{find_primer_pairs, DiscoveryParams};
//! let seq = "ACGTTGCAACGTAGGCTAGCTAGGATCCAT";
//! let msa = format!(">a\n{seq}\n>b\n{seq}\n");
//! let params = DiscoveryParams { min_primer_len: 18, max_primer_len: 20, ..Default::default() };
//! let outcome = find_primer_pairs(&msa, None, &params).unwrap();
//! assert!(outcome.is_no_results()); // a flat curve has no minima
//! ```

pub mod alignment;
pub mod config;
pub mod entropy;
pub mod error;
pub mod finder;
pub mod iupac;
pub mod outgroup;
pub mod pairing;
pub mod peaks;
pub mod primer;
pub mod report;
pub mod seqio;
pub mod data { pub mod iupac; }

pub use config::{DiscoveryParams, Limits};
pub use error::{PrimerError, Result};
pub use finder::{find_primer_pairs, DiscoveryOutcome, DiscoveryState, PrimerFinder};
pub use pairing::PrimerPair;
pub use primer::Primer;

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
