//! Error type shared by every stage of primer discovery.
//!
//! Input-format and parameter errors are raised before any scanning starts;
//! [`PrimerError::ResourceLimitExceeded`] guards the two places where work can
//! grow combinatorially (variant expansion and pair enumeration).
//!
//! An empty result is **not** an error: see [`crate::finder::DiscoveryOutcome`].

/// Errors that can be returned by the algorithms in this crate.
#[derive(thiserror::Error, Debug)]
pub enum PrimerError {
    /// The FASTA text could not be parsed.
    #[error("malformed FASTA input: {0}")]
    MalformedFasta(String),
    /// The alignment contained no records.
    #[error("alignment contains no sequences")]
    EmptyAlignment,
    /// An alignment cell holds a symbol outside `ACGTRYSWKMBDHVN-`.
    #[error("invalid alignment character {character:?} in record {record:?} at column {column}")]
    InvalidAlignmentCharacter { record: String, column: usize, character: char },
    /// An outgroup sequence holds a symbol outside the IUPAC nucleotide alphabet.
    #[error("invalid outgroup character {character:?} in record {record:?} at position {position}")]
    InvalidOutgroupCharacter { record: String, position: usize, character: char },
    /// A primer could not be built from the given sequence.
    #[error("invalid primer sequence {sequence:?}: {reason}")]
    InvalidPrimer { sequence: String, reason: &'static str },
    /// A discovery parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Variant expansion or pair enumeration would exceed a configured bound.
    #[error("{what} limit exceeded: {requested} requested, limit is {limit}")]
    ResourceLimitExceeded { what: &'static str, limit: usize, requested: u128 },
    /// The exact-match automaton over primer variants could not be built.
    #[error("failed to build variant matcher: {0}")]
    Matcher(#[from] aho_corasick::BuildError),
    /// The outgroup worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Reading an input file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PrimerError>;
