//! Pointwise mutual information between two words of the token stream.

use log::debug;

use crate::cooccurrence::{window_end, window_start};

/// Number of `word1` occurrences whose context window contains `word2` at least once.
///
/// The search runs from `word1` only; the count is not symmetrized.
pub fn co_occurrence_count(word1: &str, word2: &str, tokens: &[String], window: usize) -> usize {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| *token == word1)
        .filter(|(i, _)| {
            let start = window_start(*i, window);
            let end = window_end(*i, window, tokens.len());
            (start..end).any(|j| j != *i && tokens[j] == word2)
        })
        .count()
}

/// `log2(P(word1, word2) / (P(word1) * P(word2)))` over the whole stream.
///
/// Returns `None` when either word is absent, when the words never share a
/// window, or when the stream is empty. A joint probability of exactly zero and
/// "no signal" are deliberately the same outcome.
pub fn pmi(word1: &str, word2: &str, tokens: &[String], window: usize) -> Option<f64> {
    let total = tokens.len() as f64;
    let freq1 = tokens.iter().filter(|t| *t == word1).count();
    let freq2 = tokens.iter().filter(|t| *t == word2).count();
    let joint = co_occurrence_count(word1, word2, tokens, window);

    let p_x = freq1 as f64 / total;
    let p_y = freq2 as f64 / total;
    let p_xy = joint as f64 / total;
    debug!(
        "PMI({:?}, {:?}): n={} f1={} f2={} joint={}",
        word1, word2, tokens.len(), freq1, freq2, joint
    );

    if p_x == 0.0 || p_y == 0.0 || p_xy == 0.0 || p_xy.is_nan() {
        return None;
    }
    Some((p_xy / (p_x * p_y)).log2())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_never_co_occur_is_undefined() {
        let tokens = words(&["a", "x", "x", "x", "b"]);
        assert_eq!(pmi("a", "b", &tokens, 1), None);
    }

    #[test]
    fn test_absent_word_is_undefined() {
        let tokens = words(&["a", "b"]);
        assert_eq!(pmi("a", "zzz", &tokens, 3), None);
        assert_eq!(pmi("a", "b", &[], 3), None);
    }

    #[test]
    fn test_adjacent_pair_is_positive() {
        let tokens = words(&["a", "b", "x", "y", "a", "b", "z", "w"]);
        let value = pmi("a", "b", &tokens, 1).unwrap();
        // P(a)=P(b)=P(a,b)=2/8 => log2(0.25 / 0.0625) = 2
        assert!((value - 2.0).abs() < 1e-12);
        assert!(value.is_finite() && value > 0.0);
    }

    #[test]
    fn test_one_way_count() {
        // every "a" sees "b", but only one of the two "b" sees "a"
        let tokens = words(&["a", "b", "x", "x", "x", "b"]);
        assert_eq!(co_occurrence_count("a", "b", &tokens, 1), 1);
        assert_eq!(co_occurrence_count("b", "a", &tokens, 1), 1);
        let tokens = words(&["b", "a", "b"]);
        assert_eq!(co_occurrence_count("a", "b", &tokens, 1), 1);
        assert_eq!(co_occurrence_count("b", "a", &tokens, 1), 2);
    }

    #[test]
    fn test_word_does_not_pair_with_itself() {
        let tokens = words(&["a", "x", "x", "x", "a"]);
        assert_eq!(co_occurrence_count("a", "a", &tokens, 1), 0);
        assert_eq!(co_occurrence_count("a", "a", &tokens, 4), 2);
    }
}
