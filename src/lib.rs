#![forbid(unsafe_code)]
//! # word_proximity
//!
//! Statistics about a target word in a year-partitioned corpus:
//!
//! - per-year occurrence ratio of the target,
//! - a co-occurrence proximity graph of first- and second-degree context words,
//! - pointwise mutual information between the target and a neighbor word,
//! - the positional distribution of that neighbor around the target.
//!
//! ## Example
//! ```
//! use word_proximity::{Analysis, AnalysisOptions, Corpus};
//!
//! let mut corpus = Corpus::new();
//! corpus.add_segment(1929, "the crisis hit the banks").unwrap();
//! corpus.add_segment(1930, "banks and crisis again").unwrap();
//!
//! let mut options = AnalysisOptions::default();
//! options.context = 2;
//! let analysis = Analysis::new(&corpus, "crisis", options).unwrap();
//!
//! let report = analysis.report().unwrap();
//! assert_eq!(report.ratios.len(), 2);
//! assert_eq!(report.graph.nodes[0].word, "crisis");
//! ```

pub mod analysis;
pub mod cooccurrence;
pub mod corpus;
pub mod error;
pub mod export;
pub mod graph;
pub mod ingest;
pub mod layout;
pub mod pmi;
pub mod positional;
pub mod ratio;
pub mod tokenize;

pub use analysis::{Analysis, AnalysisOptions, AnalysisReport, ExclusionSet, MAX_CONTEXT};
pub use cooccurrence::{ContextExtraction, context_window, extract_context, window_end, window_start};
pub use corpus::{Admission, Corpus, DEFAULT_MAX_TOKENS, YearSegment};
pub use error::{AnalysisError, Result};
pub use export::{ExportFormat, csv_safe_cell, export_report, summary};
pub use graph::{Edge, GraphNode, GraphParams, ProximityGraph, Subgraph, build_graph, combined_proximity};
pub use ingest::{
    FailedUnit, LoadReport, MAX_YEAR_SPAN, UnitFailure, collect_year_files, load_corpus,
    print_failed_units,
};
pub use layout::{NodePosition, SceneBounds, place, scene_bounds};
pub use pmi::{co_occurrence_count, pmi};
pub use positional::{PositionCount, positional_counts, with_offsets};
pub use ratio::{MatchMode, YearRatio, yearly_ratio, yearly_ratios};
pub use tokenize::{count_words, rank_by_frequency, token_count, tokenize};
