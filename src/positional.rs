//! Where a neighbor word sits relative to the target.

use serde::Serialize;

use crate::cooccurrence::{window_end, window_start};

/// Count of the neighbor at one relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionCount {
    pub offset: isize,
    pub count: usize,
}

/// Histogram of `neighbor` around every `target` occurrence.
///
/// The result has `2 * window + 1` buckets; bucket `offset + window` counts the
/// neighbor at that offset. Offset 0 is the target itself and stays 0 even when
/// `neighbor == target`.
pub fn positional_counts(
    tokens: &[String],
    target: &str,
    neighbor: &str,
    window: usize,
) -> Vec<usize> {
    let mut counts = vec![0usize; 2 * window + 1];
    for (i, token) in tokens.iter().enumerate() {
        if token != target {
            continue;
        }
        let start = window_start(i, window);
        let end = window_end(i, window, tokens.len());
        for j in start..end {
            if j != i && tokens[j] == neighbor {
                counts[j + window - i] += 1;
            }
        }
    }
    counts
}

/// Pairs each bucket of a histogram with its signed offset.
pub fn with_offsets(counts: &[usize]) -> Vec<PositionCount> {
    let window = (counts.len() / 2) as isize;
    counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| PositionCount {
            offset: idx as isize - window,
            count,
        })
        .collect()
}
