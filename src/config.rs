//! Discovery parameters and resource limits.
//!
//! [`DiscoveryParams`] carries every threshold of a discovery run. It
//! (de)serialises with `serde`; missing JSON fields take their default values,
//! so a parameter file only needs the fields it changes.
//!
//! # Examples
//!
//! ```rust
//! use entroprimer::config::DiscoveryParams;
//!
//! let params = DiscoveryParams::from_json_str(r#"{ "min_primer_len": 20, "na_conc": 0.05 }"#).unwrap();
//! assert_eq!(params.min_primer_len, 20);
//! assert_eq!(params.amplicon_upper, 150);
//! params.validate().unwrap();
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};
use crate::pairing::PairCriteria;

/// Bounds on the work a single run may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest number of concrete variants a primer may expand to during
    /// outgroup screening (`4^8`: eight `N`s).
    pub max_variants: usize,
    /// Largest number of accepted primer pairs.
    pub max_pairs: usize,
    /// Worker threads for outgroup screening (`None` = all logical cores).
    pub threads: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_variants: 65_536, max_pairs: 1_000_000, threads: None }
    }
}

/// Parameters of a discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryParams {
    /// Shortest primer (window) length scanned.
    pub min_primer_len: usize,
    /// Longest primer length scanned, exclusive.
    pub max_primer_len: usize,
    /// Molar Na+ concentration; `None` selects the salt-free Tm estimate.
    pub na_conc: Option<f64>,
    pub amplicon_lower: usize,
    pub amplicon_upper: usize,
    pub max_degeneracy: u32,
    pub min_melting_temp: f64,
    pub max_melting_temp: f64,
    /// Minimum GC fraction in `[0, 1]`.
    pub min_gc: f64,
    /// Maximum GC fraction in `[0, 1]`.
    pub max_gc: f64,
    /// Keep only primers with a good 3' GC clamp.
    pub find_gc_clamp: bool,
    /// Drop primers with a bad 3' GC clamp.
    pub filter_gc_clamp: bool,
    /// A pair survives outgroup screening when one primer is fewer than this many edits from an outgroup window.
    pub max_edit_distance: usize,
    pub limits: Limits,
}

impl Default for DiscoveryParams {
    fn default() -> Self {
        Self {
            min_primer_len: 18,
            max_primer_len: 25,
            na_conc: None,
            amplicon_lower: 75,
            amplicon_upper: 150,
            max_degeneracy: 2,
            min_melting_temp: 52.0,
            max_melting_temp: 58.0,
            min_gc: 0.40,
            max_gc: 0.60,
            find_gc_clamp: true,
            filter_gc_clamp: true,
            max_edit_distance: 2,
            limits: Limits::default(),
        }
    }
}

impl DiscoveryParams {
    /// Check every range constraint; the first violation is reported.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(PrimerError::InvalidParameter(msg));
        if self.min_primer_len == 0 {
            return bad("min_primer_len must be at least 1".into());
        }
        if self.min_primer_len >= self.max_primer_len {
            return bad(format!(
                "min_primer_len ({}) must be less than max_primer_len ({})",
                self.min_primer_len, self.max_primer_len
            ));
        }
        if let Some(na) = self.na_conc {
            if !(na.is_finite() && na > 0.0) {
                return bad(format!("na_conc must be a positive number, got {na}"));
            }
        }
        if self.amplicon_lower > self.amplicon_upper {
            return bad(format!(
                "amplicon_lower ({}) must not exceed amplicon_upper ({})",
                self.amplicon_lower, self.amplicon_upper
            ));
        }
        if !(self.min_melting_temp.is_finite() && self.max_melting_temp.is_finite()) {
            return bad("melting temperature bounds must be finite".into());
        }
        if self.min_melting_temp > self.max_melting_temp {
            return bad(format!(
                "min_melting_temp ({}) must not exceed max_melting_temp ({})",
                self.min_melting_temp, self.max_melting_temp
            ));
        }
        for (name, v) in [("min_gc", self.min_gc), ("max_gc", self.max_gc)] {
            if !(0.0..=1.0).contains(&v) {
                return bad(format!("{name} must be a fraction in [0, 1], got {v}"));
            }
        }
        if self.min_gc > self.max_gc {
            return bad(format!("min_gc ({}) must not exceed max_gc ({})", self.min_gc, self.max_gc));
        }
        if self.limits.max_variants == 0 {
            return bad("max_variants must be at least 1".into());
        }
        if self.limits.threads == Some(0) {
            return bad("threads must be at least 1".into());
        }
        Ok(())
    }

    /// Thresholds for the pair assembler.
    pub fn pair_criteria(&self) -> PairCriteria {
        PairCriteria {
            max_degeneracy: self.max_degeneracy,
            min_melting_temp: self.min_melting_temp,
            max_melting_temp: self.max_melting_temp,
            min_gc: self.min_gc,
            max_gc: self.max_gc,
            amp_min: self.amplicon_lower,
            amp_max: self.amplicon_upper,
            select_gc_clamp: self.find_gc_clamp,
            omit_gc_clamp: self.filter_gc_clamp,
        }
    }

    /// Parse JSON; absent fields keep their defaults.
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load parameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let p = path.as_ref();
        let text = std::fs::read_to_string(p).with_context(|| format!("read parameters: {}", p.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parse parameters: {}", p.display()))
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        DiscoveryParams::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p = DiscoveryParams::from_json_str(r#"{"max_gc": 0.7, "limits": {"threads": 2}}"#).unwrap();
        assert_eq!(p.max_gc, 0.7);
        assert_eq!(p.min_gc, 0.40);
        assert_eq!(p.limits.threads, Some(2));
        assert_eq!(p.limits.max_variants, 65_536);
    }

    #[test]
    fn json_round_trip() {
        let p = DiscoveryParams { na_conc: Some(0.05), ..Default::default() };
        let text = serde_json::to_string(&p).unwrap();
        assert_eq!(DiscoveryParams::from_json_str(&text).unwrap(), p);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DiscoveryParams::from_json_str("{ min_gc: }").is_err());
    }

    #[test]
    fn range_violations() {
        let cases = [
            DiscoveryParams { min_primer_len: 0, ..Default::default() },
            DiscoveryParams { min_primer_len: 20, max_primer_len: 20, ..Default::default() },
            DiscoveryParams { na_conc: Some(0.0), ..Default::default() },
            DiscoveryParams { na_conc: Some(-1.0), ..Default::default() },
            DiscoveryParams { amplicon_lower: 200, ..Default::default() },
            DiscoveryParams { min_melting_temp: 70.0, ..Default::default() },
            DiscoveryParams { max_melting_temp: f64::NAN, ..Default::default() },
            DiscoveryParams { min_gc: -0.1, ..Default::default() },
            DiscoveryParams { max_gc: 1.5, ..Default::default() },
            DiscoveryParams { min_gc: 0.7, ..Default::default() },
            DiscoveryParams { limits: Limits { max_variants: 0, ..Default::default() }, ..Default::default() },
            DiscoveryParams { limits: Limits { threads: Some(0), ..Default::default() }, ..Default::default() },
        ];
        for c in cases {
            assert!(matches!(c.validate(), Err(PrimerError::InvalidParameter(_))), "{c:?}");
        }
    }

    #[test]
    fn criteria_mirror_parameters() {
        let p = DiscoveryParams { amplicon_lower: 10, find_gc_clamp: false, ..Default::default() };
        let c = p.pair_criteria();
        assert_eq!(c.amp_min, 10);
        assert_eq!(c.amp_max, 150);
        assert!(!c.select_gc_clamp);
        assert!(c.omit_gc_clamp);
    }
}
