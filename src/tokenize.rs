use std::collections::HashMap;

/// Returns true for characters that belong to a word: letters, digits and `_`.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn words_of(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .map(|token| {
            // lowercasing may yield combining marks (`İ` -> `i\u{307}`); keep word chars only
            token
                .to_lowercase()
                .chars()
                .filter(|&c| is_word_char(c))
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
}

///Splits text into lowercase word tokens.
///Any run of non-word characters is a single delimiter, so no empty tokens are emitted.
/// # Example
/// ```
/// use word_proximity::tokenize;
/// let tokens = tokenize("a,, b!!c");
/// assert_eq!(tokens, vec!["a", "b", "c"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    words_of(text).collect()
}

///Number of tokens [`tokenize`] yields for `text`.
pub fn token_count(text: &str) -> usize {
    words_of(text).count()
}

///Takes a slice of words and counts the quantity of each word.
/// # Example
/// ```
/// use word_proximity::count_words;
/// let words = vec!["one".to_string(), "two".to_string(), "two".to_string()];
/// let counted = count_words(&words);
/// assert_eq!(counted["two"], 2);
/// ```
pub fn count_words(words: &[String]) -> HashMap<String, usize> {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    for word in words {
        *frequency.entry(word.to_owned()).or_insert(0) += 1;
    }
    frequency
}

///Ranks words by frequency, most frequent first.
///Words with equal counts keep the order of their first appearance in `words`.
/// # Example
/// ```
/// use word_proximity::rank_by_frequency;
/// let words: Vec<String> = ["b", "a", "a", "c", "b", "a"].iter().map(|s| s.to_string()).collect();
/// let ranked = rank_by_frequency(&words);
/// let expected = vec![("a".to_string(), 3), ("b".to_string(), 2), ("c".to_string(), 1)];
/// assert_eq!(ranked, expected);
/// ```
pub fn rank_by_frequency(words: &[String]) -> Vec<(String, usize)> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<(String, usize)> = Vec::new();
    for word in words {
        match position.get(word.as_str()) {
            Some(&idx) => ranked[idx].1 += 1,
            None => {
                position.insert(word.as_str(), ranked.len());
                ranked.push((word.clone(), 1));
            }
        }
    }
    // sort_by is stable, ties stay in first-appearance order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_collapses_delimiters() {
        assert_eq!(tokenize("a,, b!!c"), words(&["a", "b", "c"]));
        assert_eq!(tokenize("  --The Crisis_Year 1929!  "), words(&["the", "crisis_year", "1929"]));
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ,.;!? ").is_empty());
    }

    #[test]
    fn test_tokenize_idempotent() {
        let first = tokenize("Economic crisis, again: the CRISIS of 2008 (and 1929).");
        let second = tokenize(&first.join(" "));
        assert_eq!(first, second);
    }

    #[test]
    fn test_token_count_matches_tokenize() {
        let text = "one,, two three!!four";
        assert_eq!(token_count(text), tokenize(text).len());
        assert_eq!(token_count(""), 0);
    }

    #[test]
    fn test_non_ascii_tokens() {
        let text = "İstanbul, café ÉCOLE";
        assert_eq!(tokenize(text), words(&["istanbul", "café", "école"]));
        assert_eq!(token_count(text), tokenize(text).len());
        let once = tokenize(text);
        assert_eq!(tokenize(&once.join(" ")), once);
    }

    #[test]
    fn test_count() {
        let counted = count_words(&words(&["one", "two", "two", "three", "three", "three"]));
        let mut words_map = HashMap::new();
        words_map.insert("one".to_string(), 1_usize);
        words_map.insert("two".to_string(), 2_usize);
        words_map.insert("three".to_string(), 3_usize);
        assert_eq!(counted, words_map);
    }

    #[test]
    fn test_rank_ties_keep_first_appearance() {
        let ranked = rank_by_frequency(&words(&["x", "y", "z", "y", "x"]));
        assert_eq!(
            ranked,
            vec![("x".to_string(), 2), ("y".to_string(), 2), ("z".to_string(), 1)]
        );
    }
}
