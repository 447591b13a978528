//! Year-partitioned corpus store with a global token cap.

use log::{debug, warn};
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::tokenize::{token_count, tokenize};

/// Default cap on the total number of tokens across the whole corpus.
pub const DEFAULT_MAX_TOKENS: usize = 9_999_999;

/// Text loaded for one year of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSegment {
    pub year: i32,
    pub text: String,
}

/// Outcome of adding a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Segment stored, running total still within the cap.
    Accepted,
    /// Segment stored, but the running total now exceeds the cap. The corpus is closed.
    CapReached { year: i32, total_tokens: usize },
}

/// Holds per-year text segments in insertion order.
///
/// Once a segment pushes the running token total strictly past `max_tokens`,
/// that segment is kept and every later `add_segment` call is refused.
#[derive(Debug, Clone)]
pub struct Corpus {
    segments: Vec<YearSegment>,
    max_tokens: usize,
    total_tokens: usize,
    capped_at: Option<i32>,
}

impl Default for Corpus {
    fn default() -> Self {
        Self::with_max_tokens(DEFAULT_MAX_TOKENS)
    }
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(max_tokens: usize) -> Self {
        Self {
            segments: Vec::new(),
            max_tokens,
            total_tokens: 0,
            capped_at: None,
        }
    }

    /// Adds the text of one year.
    pub fn add_segment(&mut self, year: i32, text: impl Into<String>) -> Result<Admission> {
        if let Some(capped) = self.capped_at {
            return Err(AnalysisError::CorpusFull(capped));
        }
        if self.segments.iter().any(|s| s.year == year) {
            return Err(AnalysisError::DuplicateYear(year));
        }

        let text = text.into();
        let tokens = token_count(&text);
        self.total_tokens += tokens;
        self.segments.push(YearSegment { year, text });
        debug!(
            "Added year {} ({} tokens, running total {})",
            year, tokens, self.total_tokens
        );

        if self.total_tokens > self.max_tokens {
            warn!(
                "Token cap of {} exceeded at year {} ({} tokens); no further years are loaded",
                self.max_tokens, year, self.total_tokens
            );
            self.capped_at = Some(year);
            return Ok(Admission::CapReached {
                year,
                total_tokens: self.total_tokens,
            });
        }
        Ok(Admission::Accepted)
    }

    pub fn segments(&self) -> &[YearSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Year whose segment pushed the corpus over the cap, if any.
    pub fn capped_at(&self) -> Option<i32> {
        self.capped_at
    }

    /// All segment texts joined with a single space, in insertion order.
    pub fn all_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Tokens of the whole corpus. Every call derives a fresh sequence.
    pub fn token_stream(&self) -> Vec<String> {
        tokenize(&self.all_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_text_joins_in_insertion_order() {
        let mut corpus = Corpus::new();
        corpus.add_segment(1931, "later text").unwrap();
        corpus.add_segment(1930, "Earlier, text").unwrap();
        assert_eq!(corpus.all_text(), "later text Earlier, text");
        assert_eq!(
            corpus.token_stream(),
            vec!["later", "text", "earlier", "text"]
        );
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let mut corpus = Corpus::new();
        corpus.add_segment(2001, "a").unwrap();
        assert!(matches!(
            corpus.add_segment(2001, "b"),
            Err(AnalysisError::DuplicateYear(2001))
        ));
    }

    #[test]
    fn test_cap_keeps_offending_segment_and_closes() {
        let mut corpus = Corpus::with_max_tokens(4);
        assert_eq!(corpus.add_segment(1, "a b").unwrap(), Admission::Accepted);
        // running total equal to the cap is still accepted
        assert_eq!(corpus.add_segment(2, "c d").unwrap(), Admission::Accepted);
        assert_eq!(
            corpus.add_segment(3, "e").unwrap(),
            Admission::CapReached {
                year: 3,
                total_tokens: 5
            }
        );
        assert_eq!(corpus.segments().len(), 3);
        assert_eq!(corpus.capped_at(), Some(3));
        assert!(matches!(
            corpus.add_segment(4, "f"),
            Err(AnalysisError::CorpusFull(3))
        ));
        assert_eq!(corpus.segments().len(), 3);
    }

    #[test]
    fn test_total_tokens_match_token_stream() {
        let mut corpus = Corpus::new();
        corpus.add_segment(1923, "İstanbul İZMİR, Ankara").unwrap();
        corpus.add_segment(1924, "Straße ǅemal").unwrap();
        assert_eq!(corpus.total_tokens(), corpus.token_stream().len());
        assert_eq!(corpus.total_tokens(), 5);
    }
}
