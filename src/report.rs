//! Tabular views of discovery results.
//!
//! Results are laid out as `polars` DataFrames so the CLI can pretty-print them
//! or stream them as CSV with the same code path.

use std::io::Write;

use polars::prelude::*;

use crate::entropy::EntropyCurve;
use crate::pairing::PrimerPair;
use crate::primer::Primer;

/// One row per pair: both primers' attributes, amplicon length and outgroup distances.
pub fn pairs_frame(pairs: &[PrimerPair]) -> PolarsResult<DataFrame> {
    let fwd: Vec<&Primer> = pairs.iter().map(PrimerPair::forward).collect();
    let rev: Vec<&Primer> = pairs.iter().map(PrimerPair::reverse).collect();
    let dist = |pick: fn(&PrimerPair) -> Option<usize>| -> Vec<Option<u64>> {
        pairs.iter().map(|p| pick(p).map(|d| d as u64)).collect()
    };

    df!(
        "forward"            => fwd.iter().map(|p| p.seq().to_string()).collect::<Vec<_>>(),
        "forward_pos"        => fwd.iter().map(|p| p.pos() as u64).collect::<Vec<_>>(),
        "forward_tm_min"     => fwd.iter().map(|p| p.melting_temp_range().0).collect::<Vec<_>>(),
        "forward_tm_max"     => fwd.iter().map(|p| p.melting_temp_range().1).collect::<Vec<_>>(),
        "forward_degeneracy" => fwd.iter().map(|p| p.degeneracy()).collect::<Vec<_>>(),
        "forward_gc_min"     => fwd.iter().map(|p| p.gc_range().0).collect::<Vec<_>>(),
        "forward_gc_max"     => fwd.iter().map(|p| p.gc_range().1).collect::<Vec<_>>(),
        "reverse"            => rev.iter().map(|p| p.seq().to_string()).collect::<Vec<_>>(),
        "reverse_pos"        => rev.iter().map(|p| p.pos() as u64).collect::<Vec<_>>(),
        "reverse_tm_min"     => rev.iter().map(|p| p.melting_temp_range().0).collect::<Vec<_>>(),
        "reverse_tm_max"     => rev.iter().map(|p| p.melting_temp_range().1).collect::<Vec<_>>(),
        "reverse_degeneracy" => rev.iter().map(|p| p.degeneracy()).collect::<Vec<_>>(),
        "reverse_gc_min"     => rev.iter().map(|p| p.gc_range().0).collect::<Vec<_>>(),
        "reverse_gc_max"     => rev.iter().map(|p| p.gc_range().1).collect::<Vec<_>>(),
        "amplicon_length"    => pairs.iter().map(PrimerPair::amplicon_length).collect::<Vec<_>>(),
        "outgroup_dist_fwd"  => dist(|p| p.outgroup().and_then(|d| d.forward)),
        "outgroup_dist_rev"  => dist(|p| p.outgroup().and_then(|d| d.reverse)),
    )
}

/// Attributes of individual primers.
pub fn primers_frame(primers: &[Primer]) -> PolarsResult<DataFrame> {
    df!(
        "sequence"      => primers.iter().map(|p| p.seq().to_string()).collect::<Vec<_>>(),
        "pos"           => primers.iter().map(|p| p.pos() as u64).collect::<Vec<_>>(),
        "length"        => primers.iter().map(|p| p.length() as u64).collect::<Vec<_>>(),
        "degeneracy"    => primers.iter().map(Primer::degeneracy).collect::<Vec<_>>(),
        "tm_min"        => primers.iter().map(|p| p.melting_temp_range().0).collect::<Vec<_>>(),
        "tm_max"        => primers.iter().map(|p| p.melting_temp_range().1).collect::<Vec<_>>(),
        "gc_min"        => primers.iter().map(|p| p.gc_range().0).collect::<Vec<_>>(),
        "gc_max"        => primers.iter().map(|p| p.gc_range().1).collect::<Vec<_>>(),
        "good_gc_clamp" => primers.iter().map(Primer::good_gc_clamp).collect::<Vec<_>>(),
        "bad_gc_clamp"  => primers.iter().map(Primer::bad_gc_clamp).collect::<Vec<_>>(),
        "variants"      => primers.iter().map(|p| u64::try_from(p.variant_count()).unwrap_or(u64::MAX)).collect::<Vec<_>>(),
    )
}

/// The entropy curve of one window length; gapped windows have null entropy and consensus.
pub fn curve_frame(curve: &EntropyCurve, peaks: &[usize]) -> PolarsResult<DataFrame> {
    let n = curve.len();
    df!(
        "start"     => (0..n).map(|i| i as u64).collect::<Vec<_>>(),
        "k"         => vec![curve.k() as u64; n],
        "entropy"   => curve.values(),
        "consensus" => (0..n).map(|i| curve.consensus(i).map(str::to_string)).collect::<Vec<_>>(),
        "minimum"   => (0..n).map(|i| peaks.binary_search(&i).is_ok()).collect::<Vec<_>>(),
    )
}

/// Write `df` as CSV with a header row.
pub fn write_csv<W: Write>(df: &mut DataFrame, out: W) -> PolarsResult<()> {
    CsvWriter::new(out).include_header(true).finish(df)
}

#[cfg(test)]
mod report_tests {
    use super::*;
    use crate::alignment::Alignment;
    use crate::entropy;

    fn p(seq: &str, pos: usize) -> Primer { Primer::new(seq, pos, None).unwrap() }

    #[test]
    fn pair_rows() {
        let pairs = vec![PrimerPair::new(p("ACGT", 0), p("TTGR", 20)), PrimerPair::new(p("ACGT", 0), p("GGCC", 40))];
        let df = pairs_frame(&pairs).unwrap();
        assert_eq!(df.shape(), (2, 17));
        let amp = df.column("amplicon_length").unwrap().i64().unwrap();
        assert_eq!(amp.get(0), Some(16));
        assert_eq!(amp.get(1), Some(36));
        let deg = df.column("reverse_degeneracy").unwrap().u32().unwrap();
        assert_eq!(deg.get(0), Some(1));
        assert_eq!(df.column("outgroup_dist_fwd").unwrap().null_count(), 2);
    }

    #[test]
    fn curve_rows_mark_gaps_and_minima() {
        let aln = Alignment::from_fasta_str(">a\nACGTACGTAC\n>b\nAC-TACGTAC\n").unwrap();
        let curve = entropy::scan(&aln, 3).unwrap();
        let df = curve_frame(&curve, &[5]).unwrap();
        assert_eq!(df.height(), curve.len());
        assert_eq!(df.column("entropy").unwrap().null_count(), 3);
        let minimum = df.column("minimum").unwrap().bool().unwrap();
        assert_eq!(minimum.get(5), Some(true));
        assert_eq!(minimum.get(4), Some(false));
    }

    #[test]
    fn csv_has_header() {
        let mut df = primers_frame(&[p("ACGTN", 3)]).unwrap();
        let mut buf = Vec::new();
        write_csv(&mut df, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("sequence,pos,length,degeneracy"));
        assert!(lines.next().unwrap().starts_with("ACGTN,3,5,3"));
    }
}
