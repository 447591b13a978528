//! Analysis context: one corpus snapshot, one target, every view derived from it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::cooccurrence::{ContextExtraction, extract_context};
use crate::corpus::{Corpus, YearSegment};
use crate::error::{AnalysisError, Result};
use crate::graph::{GraphParams, ProximityGraph, build_graph};
use crate::layout::{self, NodePosition};
use crate::pmi::pmi;
use crate::positional::{PositionCount, positional_counts, with_offsets};
use crate::ratio::{MatchMode, YearRatio, yearly_ratios};
use crate::tokenize::rank_by_frequency;

/// Lowercase words removed from the stream before co-occurrence and graph work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    words: HashSet<String>,
}

impl ExclusionSet {
    /// Parses a comma-separated list such as `"the, and ,of"`.
    pub fn parse(list: &str) -> Self {
        let mut set = Self::default();
        set.extend(list.split(','));
        set
    }

    /// Reads one word per line. Blank lines and lines starting with `#` are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut set = Self::default();
        set.extend(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );
        Ok(set)
    }

    pub fn extend<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
    }

    pub fn merge(&mut self, other: ExclusionSet) {
        self.words.extend(other.words);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Copy of `tokens` without excluded words.
    pub fn filter(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| !self.contains(t))
            .cloned()
            .collect()
    }
}

/// Largest accepted context window.
pub const MAX_CONTEXT: usize = 10_000;

/// Caller-supplied settings of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Context window size (±context tokens).
    pub context: usize,
    pub top_words: usize,
    pub neighbors: usize,
    pub neighbor_weight: f64,
    pub proximity_strength: f64,
    pub exclusions: ExclusionSet,
    /// Neighbor for PMI and the positional histogram; the top context word when unset.
    pub neighbor: Option<String>,
    pub match_mode: MatchMode,
    /// Seed for node placement; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            context: 5,
            top_words: 10,
            neighbors: 5,
            neighbor_weight: 0.5,
            proximity_strength: 1.0,
            exclusions: ExclusionSet::default(),
            neighbor: None,
            match_mode: MatchMode::Pattern,
            seed: None,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> Result<()> {
        if self.top_words == 0 {
            return Err(AnalysisError::invalid_config("top_words must be at least 1"));
        }
        if self.neighbors == 0 {
            return Err(AnalysisError::invalid_config("neighbors must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.neighbor_weight) {
            return Err(AnalysisError::invalid_config(format!(
                "neighbor_weight must be within 0..=1, got {}",
                self.neighbor_weight
            )));
        }
        if !self.proximity_strength.is_finite() || self.proximity_strength < 0.0 {
            return Err(AnalysisError::invalid_config(format!(
                "proximity_strength must be a finite non-negative number, got {}",
                self.proximity_strength
            )));
        }
        if self.context > MAX_CONTEXT {
            return Err(AnalysisError::invalid_config(format!(
                "context must be at most {}, got {}",
                MAX_CONTEXT, self.context
            )));
        }
        Ok(())
    }

    pub fn graph_params(&self) -> GraphParams {
        GraphParams {
            top_words: self.top_words,
            neighbors: self.neighbors,
            neighbor_weight: self.neighbor_weight,
            proximity_strength: self.proximity_strength,
        }
    }
}

/// Snapshot of a corpus prepared for one target word.
///
/// Year ratios and PMI read the full token stream; co-occurrence and the graph
/// read the stream with excluded words removed.
#[derive(Debug, Clone)]
pub struct Analysis {
    target: String,
    options: AnalysisOptions,
    segments: Vec<YearSegment>,
    tokens: Vec<String>,
    filtered: Vec<String>,
}

impl Analysis {
    pub fn new(corpus: &Corpus, target: &str, options: AnalysisOptions) -> Result<Self> {
        let target = target.trim().to_lowercase();
        if target.is_empty() {
            return Err(AnalysisError::invalid_config("target word must not be empty"));
        }
        options.validate()?;

        let tokens = corpus.token_stream();
        let filtered = options.exclusions.filter(&tokens);
        info!(
            "Analysis of {:?}: {} years, {} tokens ({} after exclusions)",
            target,
            corpus.segments().len(),
            tokens.len(),
            filtered.len()
        );
        Ok(Self {
            target,
            options,
            segments: corpus.segments().to_vec(),
            tokens,
            filtered,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn filtered_tokens(&self) -> &[String] {
        &self.filtered
    }

    pub fn ratios(&self) -> Result<Vec<YearRatio>> {
        yearly_ratios(&self.target, &self.segments, self.options.match_mode)
    }

    pub fn context(&self) -> ContextExtraction {
        extract_context(&self.filtered, &self.target, self.options.context)
    }

    pub fn graph(&self) -> ProximityGraph {
        build_graph(&self.context(), &self.target, &self.options.graph_params())
    }

    /// Most frequent context words, limited to `top_words`.
    pub fn top_words(&self) -> Vec<(String, usize)> {
        rank_by_frequency(&self.context().related_words)
            .into_iter()
            .take(self.options.top_words)
            .collect()
    }

    /// Explicit neighbor if configured, otherwise the most frequent context word.
    pub fn neighbor(&self) -> Option<String> {
        self.explicit_neighbor()
            .or_else(|| self.top_words().into_iter().next().map(|(word, _)| word))
    }

    fn explicit_neighbor(&self) -> Option<String> {
        self.options
            .neighbor
            .as_deref()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
    }

    pub fn pmi(&self, neighbor: &str) -> Option<f64> {
        pmi(&self.target, neighbor, &self.tokens, self.options.context)
    }

    pub fn positional(&self, neighbor: &str) -> Vec<usize> {
        positional_counts(&self.tokens, &self.target, neighbor, self.options.context)
    }

    /// Runs every view and collects the results.
    pub fn report(&self) -> Result<AnalysisReport> {
        let ratios = self.ratios()?;
        let context = self.context();
        let graph = build_graph(&context, &self.target, &self.options.graph_params());
        let positions = layout::place(&graph, layout::DEFAULT_SCALE, self.options.seed);
        let top_words: Vec<(String, usize)> = rank_by_frequency(&context.related_words)
            .into_iter()
            .take(self.options.top_words)
            .collect();

        let neighbor = self
            .explicit_neighbor()
            .or_else(|| top_words.first().map(|(word, _)| word.clone()));
        let (pmi, positional) = match &neighbor {
            Some(word) => (self.pmi(word), with_offsets(&self.positional(word))),
            None => {
                debug!("No neighbor word available; PMI and positional counts skipped");
                (None, Vec::new())
            }
        };

        Ok(AnalysisReport {
            target: self.target.clone(),
            context: self.options.context,
            total_tokens: self.tokens.len(),
            ratios,
            top_words,
            graph,
            positions,
            neighbor,
            pmi,
            positional,
        })
    }
}

/// Every view of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub target: String,
    pub context: usize,
    pub total_tokens: usize,
    pub ratios: Vec<YearRatio>,
    pub top_words: Vec<(String, usize)>,
    pub graph: ProximityGraph,
    pub positions: Vec<NodePosition>,
    pub neighbor: Option<String>,
    /// `None` when PMI is undefined for the pair.
    pub pmi: Option<f64>,
    pub positional: Vec<PositionCount>,
}
