use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use entroprimer::alignment::Alignment;
use entroprimer::outgroup::Outgroup;
use entroprimer::{entropy, peaks, report, seqio};
use entroprimer::{DiscoveryOutcome, DiscoveryParams, Primer, PrimerFinder};

/// entroprimer CLI
#[derive(Parser)]
#[command(name = "entroprimer")]
#[command(version)]
#[command(about = "Degenerate primer discovery from low-entropy alignment windows", long_about = None)]
struct Cli {
    /// Log progress (equivalent to RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find primer pairs in an alignment, optionally screened against an outgroup
    Find {
        /// Aligned sequences (FASTA, optionally compressed)
        #[arg(long, value_name = "FILE")]
        msa: PathBuf,
        /// Outgroup sequences the primers should not match (FASTA)
        #[arg(long, value_name = "FILE")]
        outgroup: Option<PathBuf>,
        /// JSON parameter file; flags below override its values
        #[arg(long, value_name = "JSON")]
        params: Option<PathBuf>,
        #[command(flatten)]
        overrides: ParamOverrides,
        /// List the candidate primers instead of pairs
        #[arg(long)]
        primers: bool,
        /// Emit CSV to stdout
        #[arg(long)]
        csv: bool,
    },

    /// Print the entropy curve of one window length with its minima
    Scan {
        /// Aligned sequences (FASTA)
        #[arg(long, value_name = "FILE")]
        msa: PathBuf,
        /// Window length
        #[arg(short, long)]
        k: usize,
        /// Emit CSV to stdout
        #[arg(long)]
        csv: bool,
    },

    /// Show the derived attributes of a degenerate primer
    Inspect {
        /// Primer sequence (IUPAC)
        seq: String,
        /// Molar Na+ concentration for the salt-adjusted Tm
        #[arg(long)]
        na_conc: Option<f64>,
    },

    /// Print the default parameters as JSON
    Defaults,
}

/// Per-parameter overrides for `find`.
#[derive(Args, Debug, Default)]
struct ParamOverrides {
    /// Shortest primer length scanned
    #[arg(long)]
    min_primer_len: Option<usize>,
    /// Longest primer length scanned (exclusive)
    #[arg(long)]
    max_primer_len: Option<usize>,
    /// Molar Na+ concentration (enables the salt-adjusted Tm)
    #[arg(long)]
    na_conc: Option<f64>,
    /// Smallest amplicon length
    #[arg(long)]
    amplicon_lower: Option<usize>,
    /// Largest amplicon length
    #[arg(long)]
    amplicon_upper: Option<usize>,
    /// Largest primer degeneracy
    #[arg(long)]
    max_degeneracy: Option<u32>,
    #[arg(long)]
    min_melting_temp: Option<f64>,
    #[arg(long)]
    max_melting_temp: Option<f64>,
    /// Minimum GC fraction (0.0-1.0)
    #[arg(long)]
    min_gc: Option<f64>,
    /// Maximum GC fraction (0.0-1.0)
    #[arg(long)]
    max_gc: Option<f64>,
    /// Keep only primers with a good 3' GC clamp (true/false)
    #[arg(long)]
    find_gc_clamp: Option<bool>,
    /// Drop primers with a bad 3' GC clamp (true/false)
    #[arg(long)]
    filter_gc_clamp: Option<bool>,
    /// Outgroup screening keeps pairs with a primer closer than this many edits
    #[arg(long)]
    max_edit_distance: Option<usize>,
    /// Variant expansion cap per primer
    #[arg(long)]
    max_variants: Option<usize>,
    /// Accepted pair cap
    #[arg(long)]
    max_pairs: Option<usize>,
    /// Threads for outgroup screening (default: all)
    #[arg(long)]
    threads: Option<usize>,
}

impl ParamOverrides {
    fn apply(&self, p: &mut DiscoveryParams) {
        if let Some(v) = self.min_primer_len { p.min_primer_len = v; }
        if let Some(v) = self.max_primer_len { p.max_primer_len = v; }
        if let Some(v) = self.na_conc { p.na_conc = Some(v); }
        if let Some(v) = self.amplicon_lower { p.amplicon_lower = v; }
        if let Some(v) = self.amplicon_upper { p.amplicon_upper = v; }
        if let Some(v) = self.max_degeneracy { p.max_degeneracy = v; }
        if let Some(v) = self.min_melting_temp { p.min_melting_temp = v; }
        if let Some(v) = self.max_melting_temp { p.max_melting_temp = v; }
        if let Some(v) = self.min_gc { p.min_gc = v; }
        if let Some(v) = self.max_gc { p.max_gc = v; }
        if let Some(v) = self.find_gc_clamp { p.find_gc_clamp = v; }
        if let Some(v) = self.filter_gc_clamp { p.filter_gc_clamp = v; }
        if let Some(v) = self.max_edit_distance { p.max_edit_distance = v; }
        if let Some(v) = self.max_variants { p.limits.max_variants = v; }
        if let Some(v) = self.max_pairs { p.limits.max_pairs = v; }
        if let Some(v) = self.threads { p.limits.threads = Some(v); }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Find { msa, outgroup, params, overrides, primers, csv } => {
            let mut p = match params {
                Some(path) => DiscoveryParams::from_json_file(path)?,
                None => DiscoveryParams::default(),
            };
            overrides.apply(&mut p);
            cmd_find(msa, outgroup, p, primers, csv)?;
        }

        Commands::Scan { msa, k, csv } => {
            cmd_scan(msa, k, csv)?;
        }

        Commands::Inspect { seq, na_conc } => {
            cmd_inspect(seq, na_conc)?;
        }

        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&DiscoveryParams::default())?);
        }
    }

    Ok(())
}

fn load_alignment(path: &PathBuf) -> Result<Alignment> {
    let records = seqio::read_fasta_path(path).with_context(|| format!("read alignment: {}", path.display()))?;
    Alignment::from_records(records).with_context(|| format!("load alignment: {}", path.display()))
}

fn cmd_find(msa: PathBuf, outgroup: Option<PathBuf>, params: DiscoveryParams, primers: bool, csv: bool) -> Result<()> {
    let finder = PrimerFinder::new(params)?;
    let alignment = load_alignment(&msa)?;
    let outgroup = match outgroup {
        Some(path) => {
            let records = seqio::read_fasta_path(&path).with_context(|| format!("read outgroup: {}", path.display()))?;
            Outgroup::from_records(records).with_context(|| format!("load outgroup: {}", path.display()))?
        }
        None => Outgroup::default(),
    };

    let state = finder.discover(alignment, &outgroup)?;
    info!("{} primers, {} pairs", state.primers().len(), state.pairs().len());

    if primers {
        let mut df = report::primers_frame(state.primers())?;
        if csv {
            report::write_csv(&mut df, std::io::stdout())?;
        } else {
            set_table_format();
            println!("{df}");
        }
        return Ok(());
    }

    match state.into_outcome() {
        DiscoveryOutcome::NoResults => {
            eprintln!("No primer pairs found.");
        }
        DiscoveryOutcome::Pairs(pairs) => {
            if csv {
                let mut df = report::pairs_frame(&pairs)?;
                report::write_csv(&mut df, std::io::stdout())?;
            } else {
                for (i, pair) in pairs.iter().enumerate() {
                    println!("Pair {}", i + 1);
                    println!("{pair}");
                    println!();
                }
            }
        }
    }
    Ok(())
}

fn cmd_scan(msa: PathBuf, k: usize, csv: bool) -> Result<()> {
    let alignment = load_alignment(&msa)?;
    let curve = entropy::scan(&alignment, k)?;
    let minima = peaks::find_minima(&curve);
    let mut df = report::curve_frame(&curve, &minima)?;

    if csv {
        report::write_csv(&mut df, std::io::stdout())?;
        return Ok(());
    }

    set_table_format();
    println!("{df}");
    println!("minima: {minima:?}");
    if let Some(start) = curve.halted_at() {
        println!("scan stopped at window {start}: a sequence ends early");
    }
    Ok(())
}

/// Polars' pretty-printer reads these; show every row and full sequences.
fn set_table_format() {
    std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
    std::env::set_var("POLARS_FMT_MAX_COLS", "100000");
    std::env::set_var("POLARS_FMT_MAX_ROWS", "1000000");
    std::env::set_var("POLARS_FMT_STR_LEN", "100000");
    std::env::set_var("POLARS_TABLE_WIDTH", "65535");
}

fn cmd_inspect(seq: String, na_conc: Option<f64>) -> Result<()> {
    let primer = Primer::new(seq.to_ascii_uppercase(), 0, na_conc)?;
    let (tm_lo, tm_hi) = primer.melting_temp_range();
    let (gc_lo, gc_hi) = primer.gc_range();
    println!("seq: {}", primer.seq());
    println!("length: {}", primer.length());
    println!("degeneracy: {}", primer.degeneracy());
    println!("variants: {}", primer.variant_count());
    println!("tm range: {tm_lo:.2} - {tm_hi:.2}");
    println!("gc range: {gc_lo:.3} - {gc_hi:.3}");
    println!("good gc clamp: {}", primer.good_gc_clamp());
    println!("bad gc clamp: {}", primer.bad_gc_clamp());
    Ok(())
}
