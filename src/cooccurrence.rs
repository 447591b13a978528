//! Sliding-window co-occurrence around a target word.

use std::collections::HashMap;

use log::debug;

///Lower bound of a context window, never below 0.
/// # Example
/// ```
/// use word_proximity::window_start;
/// assert_eq!(window_start(3, 5), 0);
/// assert_eq!(window_start(100, 5), 95);
/// ```
pub fn window_start(index: usize, window: usize) -> usize {
    index.saturating_sub(window)
}

///Exclusive upper bound of a context window, never beyond `len`.
/// # Example
/// ```
/// use word_proximity::window_end;
/// assert_eq!(window_end(5, 5, 9), 9);
/// assert_eq!(window_end(0, 2, 9), 3);
/// ```
pub fn window_end(index: usize, window: usize, len: usize) -> usize {
    index.saturating_add(window).saturating_add(1).min(len)
}

/// Context tokens around `index`, excluding the token at `index` itself.
pub fn context_window(tokens: &[String], index: usize, window: usize) -> Vec<String> {
    let start = window_start(index, window);
    let end = window_end(index, window, tokens.len());
    tokens[start..index]
        .iter()
        .chain(tokens[index + 1..end].iter())
        .cloned()
        .collect()
}

/// Output of [`extract_context`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextExtraction {
    /// Every context token of every target occurrence, in scan order.
    pub related_words: Vec<String>,
    /// For each context word, the other words that shared a window with it.
    pub neighbor_index: HashMap<String, Vec<String>>,
}

impl ContextExtraction {
    /// True when `word`'s neighbor list mentions `partner`.
    pub fn lists(&self, word: &str, partner: &str) -> bool {
        self.neighbor_index
            .get(word)
            .is_some_and(|partners| partners.iter().any(|p| p == partner))
    }
}

/// Scans `tokens` once and collects the context of every `target` occurrence.
///
/// For each context word `c` of a window, all words of that window that differ
/// from `c` are appended to `neighbor_index[c]`. Repeats of `c` inside the same
/// window are not partners of `c`.
pub fn extract_context(tokens: &[String], target: &str, window: usize) -> ContextExtraction {
    let mut extraction = ContextExtraction::default();
    let mut occurrences = 0usize;

    for (index, token) in tokens.iter().enumerate() {
        if token != target {
            continue;
        }
        occurrences += 1;
        let context = context_window(tokens, index, window);

        for word in &context {
            let partners = extraction.neighbor_index.entry(word.clone()).or_default();
            partners.extend(context.iter().filter(|w| *w != word).cloned());
        }
        extraction.related_words.extend(context);
    }

    debug!(
        "{} occurrences of {:?}, {} related words, {} distinct neighbors",
        occurrences,
        target,
        extraction.related_words.len(),
        extraction.neighbor_index.len()
    );
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_max_min_index() {
        assert_eq!(window_start(5, 5), 0);
        assert_eq!(window_end(5, 5, 9), 9);
        assert_eq!(window_start(0, 5), 0);
        assert_eq!(window_end(0, 5, 5), 5);
        assert_eq!(window_start(100, 5), 95);
        assert_eq!(window_end(100, 5, 103), 103);
        assert_eq!(window_end(1, usize::MAX, 4), 4);
    }

    #[test]
    fn test_single_occurrence_window_one() {
        let tokens = words(&["a", "b", "target", "c", "d"]);
        let ex = extract_context(&tokens, "target", 1);
        assert_eq!(ex.related_words, words(&["b", "c"]));
        assert_eq!(ex.neighbor_index["b"], words(&["c"]));
        assert_eq!(ex.neighbor_index["c"], words(&["b"]));
        assert!(!ex.neighbor_index.contains_key("a"));
    }

    #[test]
    fn test_window_clipped_at_edges() {
        let tokens = words(&["target", "x", "y", "target"]);
        let ex = extract_context(&tokens, "target", 2);
        assert_eq!(ex.related_words, words(&["x", "y", "x", "y"]));
        assert_eq!(ex.neighbor_index["x"], words(&["y", "y"]));
    }

    #[test]
    fn test_window_zero_is_empty() {
        let tokens = words(&["a", "target", "b"]);
        let ex = extract_context(&tokens, "target", 0);
        assert!(ex.related_words.is_empty());
        assert!(ex.neighbor_index.is_empty());
    }

    #[test]
    fn test_repeated_word_in_window_not_own_partner() {
        let tokens = words(&["x", "target", "x", "y"]);
        let ex = extract_context(&tokens, "target", 2);
        assert_eq!(ex.related_words, words(&["x", "x", "y"]));
        assert_eq!(ex.neighbor_index["x"], words(&["y", "y"]));
        assert_eq!(ex.neighbor_index["y"], words(&["x", "x"]));
        assert!(ex.lists("y", "x"));
        assert!(!ex.lists("x", "x"));
    }
}
