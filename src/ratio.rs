//! Per-year occurrence ratio of a target term.

use std::collections::BTreeMap;

use clap::ValueEnum;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::corpus::YearSegment;
use crate::error::Result;
use crate::tokenize::token_count;

/// How the target term is matched against a year's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The target is used unescaped as a regular expression.
    #[default]
    Pattern,
    /// The target is matched as literal text.
    Literal,
}

/// Ratio of one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearRatio {
    pub year: i32,
    pub matches: usize,
    pub tokens: usize,
    /// `matches / tokens`; `NaN` when the year has no tokens.
    pub ratio: f64,
}

fn target_regex(target: &str, mode: MatchMode) -> Result<Regex> {
    let target = target.to_lowercase();
    let pattern = match mode {
        MatchMode::Pattern => target,
        MatchMode::Literal => regex::escape(&target),
    };
    Ok(Regex::new(&pattern)?)
}

/// Computes `matches / tokens` for every year, ascending by year.
///
/// Each year is tokenized on its own. Matches are non-overlapping hits of the
/// target on the lowercased text, so `"war"` also counts inside `"warfare"`.
/// In [`MatchMode::Pattern`] metacharacters in the target keep their meaning.
pub fn yearly_ratios(
    target: &str,
    segments: &[YearSegment],
    mode: MatchMode,
) -> Result<Vec<YearRatio>> {
    let re = target_regex(target, mode)?;
    let mut by_year: BTreeMap<i32, YearRatio> = BTreeMap::new();
    for segment in segments {
        let tokens = token_count(&segment.text);
        let text = segment.text.to_lowercase();
        let matches = re.find_iter(&text).count();
        let ratio = matches as f64 / tokens as f64;
        debug!(
            "Year {}: {} matches of {:?} in {} tokens",
            segment.year, matches, target, tokens
        );
        by_year.insert(
            segment.year,
            YearRatio {
                year: segment.year,
                matches,
                tokens,
                ratio,
            },
        );
    }
    Ok(by_year.into_values().collect())
}

/// Mapping form of [`yearly_ratios`]: year to ratio.
pub fn yearly_ratio(
    target: &str,
    segments: &[YearSegment],
    mode: MatchMode,
) -> Result<BTreeMap<i32, f64>> {
    Ok(yearly_ratios(target, segments, mode)?
        .into_iter()
        .map(|r| (r.year, r.ratio))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn seg(year: i32, text: &str) -> YearSegment {
        YearSegment {
            year,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_ratio_basic() {
        let ratios = yearly_ratio("the", &[seg(1900, "the the cat")], MatchMode::Pattern).unwrap();
        assert!((ratios[&1900] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_year_is_nan() {
        let ratios = yearly_ratio("the", &[seg(1900, "")], MatchMode::Pattern).unwrap();
        assert!(ratios[&1900].is_nan());
    }

    #[test]
    fn test_years_ascending_and_case_insensitive() {
        let segments = [seg(1935, "Crisis crisis"), seg(1929, "CRISIS now")];
        let ratios = yearly_ratios("Crisis", &segments, MatchMode::Pattern).unwrap();
        assert_eq!(ratios.iter().map(|r| r.year).collect::<Vec<_>>(), vec![1929, 1935]);
        assert_eq!(ratios[0].matches, 1);
        assert_eq!(ratios[1].matches, 2);
    }

    #[test]
    fn test_substring_matches_count() {
        // "war" also matches inside "warfare"
        let ratios = yearly_ratios("war", &[seg(1, "war warfare peace")], MatchMode::Pattern).unwrap();
        assert_eq!(ratios[0].matches, 2);
        assert_eq!(ratios[0].tokens, 3);
    }

    #[test]
    fn test_pattern_vs_literal() {
        let segments = [seg(1, "a.c abc")];
        let pattern = yearly_ratios("a.c", &segments, MatchMode::Pattern).unwrap();
        let literal = yearly_ratios("a.c", &segments, MatchMode::Literal).unwrap();
        assert_eq!(pattern[0].matches, 2);
        assert_eq!(literal[0].matches, 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = yearly_ratios("(", &[seg(1, "x")], MatchMode::Pattern).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPattern(_)));
        assert!(yearly_ratios("(", &[seg(1, "(x")], MatchMode::Literal).is_ok());
    }

    #[test]
    fn test_denominator_matches_tokenizer() {
        let text = "İstanbul büyür İSTANBUL";
        let ratios = yearly_ratios("büyür", &[seg(1923, text)], MatchMode::Literal).unwrap();
        assert_eq!(ratios[0].tokens, crate::tokenize::tokenize(text).len());
        assert_eq!(ratios[0].tokens, 3);
        assert_eq!(ratios[0].matches, 1);
    }
}
