#![forbid(unsafe_code)]
//! # Word Proximity CLI
//!
//! This is the command-line interface for the `word_proximity` crate.
//! It loads a directory of per-year corpus files (`<year>.xml` or `<year>.txt`)
//! and reports, for one target word:
//!
//! - the ratio of the target per year,
//! - the proximity graph of its context words,
//! - PMI and positional counts for a neighbor word.
//!
//! ## Example
//! ```bash
//! cargo run --release -- path/to/years --target crisis --context 5 --export-format csv
//! ```
//!
//! See `--help` for all available options.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{error, warn};
use word_proximity::{
    Analysis, AnalysisOptions, DEFAULT_MAX_TOKENS, ExclusionSet, ExportFormat, MatchMode,
    export_report, load_corpus, print_failed_units, summary,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing one file per year
    path: PathBuf,

    /// Word whose surroundings are analyzed
    #[arg(long)]
    target: String,

    /// First year to load (default: earliest year file)
    #[arg(long)]
    start_year: Option<i32>,

    /// Last year to load (default: latest year file)
    #[arg(long)]
    end_year: Option<i32>,

    /// Context window size (e.g. 5 = ±5)
    #[arg(long, default_value_t = 5)]
    context: usize,

    /// Number of most frequent context words used as first-degree nodes
    #[arg(long, default_value_t = 10)]
    top_words: usize,

    /// Number of neighbors examined per first-degree node
    #[arg(long, default_value_t = 5)]
    neighbors: usize,

    /// Share of connectivity in the node proximity (0-1)
    #[arg(long, default_value_t = 0.5)]
    neighbor_weight: f64,

    /// Strength of the frequency term in the node proximity
    #[arg(long, default_value_t = 1.0)]
    proximity_strength: f64,

    /// Comma-separated words excluded from the co-occurrence graph
    #[arg(long)]
    exclude: Option<String>,

    /// Optional path to an exclusion word file (.txt, one word per line)
    #[arg(long)]
    exclude_file: Option<PathBuf>,

    /// Neighbor word for PMI and positional counts (default: top context word)
    #[arg(long)]
    neighbor: Option<String>,

    /// How the target is matched when computing yearly ratios
    #[arg(long, default_value = "pattern")]
    match_mode: MatchMode,

    /// Maximum number of tokens loaded across all years
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Seed for node placement
    #[arg(long)]
    seed: Option<u64>,

    /// Output format for export (txt, csv, tsv, json)
    #[arg(long, default_value = "txt")]
    export_format: ExportFormat,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn exclusions(cli: &Cli) -> word_proximity::Result<ExclusionSet> {
    let mut set = cli
        .exclude
        .as_deref()
        .map(ExclusionSet::parse)
        .unwrap_or_default();
    if let Some(path) = &cli.exclude_file {
        set.merge(ExclusionSet::from_file(path)?);
    }
    Ok(set)
}

fn run(cli: &Cli) -> word_proximity::Result<()> {
    let options = AnalysisOptions {
        context: cli.context,
        top_words: cli.top_words,
        neighbors: cli.neighbors,
        neighbor_weight: cli.neighbor_weight,
        proximity_strength: cli.proximity_strength,
        exclusions: exclusions(cli)?,
        neighbor: cli.neighbor.clone(),
        match_mode: cli.match_mode,
        seed: cli.seed,
    };
    options.validate()?;

    let loaded = load_corpus(&cli.path, cli.start_year, cli.end_year, cli.max_tokens)?;
    if let Some(year) = loaded.cap_reached_at {
        warn!("Reached the word limit at year {}.", year);
        eprintln!("Reached the word limit at year {}.", year);
    }

    let analysis = Analysis::new(&loaded.corpus, &cli.target, options)?;
    let report = analysis.report()?;
    println!("{}", summary(&report));

    let stem = stem_of(&cli.path);
    for path in export_report(&report, cli.export_format, &cli.out_dir, &stem)? {
        println!("Saved {}", path.display());
    }

    if !loaded.failed_units.is_empty() {
        print_failed_units(&loaded.failed_units);
    }
    Ok(())
}

fn stem_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != ".")
        .unwrap_or("corpus")
        .to_string()
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
