//! Proximity graph: ranked first- and second-degree context words around a target.
//!
//! The graph is built from a [`ContextExtraction`]:
//!
//! 1. The `top_words` most frequent related words become first-degree nodes,
//!    each linked to the target.
//! 2. For every first-degree word `W`, the `neighbors` most frequent entries of
//!    its own neighbor list are candidates. A candidate `N` is always added as a
//!    node (weight = its count in `W`'s list) but the edge `W–N` only exists if
//!    `N`'s neighbor list also mentions `W`.
//! 3. The target is always a node, weighted by its own count among the related
//!    words or `1` when it never appears there.
//!
//! Edges are stored as `from → to` and read as undirected.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::cooccurrence::ContextExtraction;
use crate::error::{AnalysisError, Result};
use crate::tokenize::{count_words, rank_by_frequency};

/// Knobs of the graph builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphParams {
    pub top_words: usize,
    pub neighbors: usize,
    /// Share of the connectivity term in the combined proximity, `0..=1`.
    pub neighbor_weight: f64,
    /// Exponent scale of the frequency term, applied as `strength / 4`.
    pub proximity_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub word: String,
    pub weight: usize,
    /// Count of the word among all related words, `0` for pure second-degree words.
    pub direct_frequency: usize,
    pub label: String,
    pub connected_edges: usize,
    pub combined: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn touches(&self, word: &str) -> bool {
        self.from == word || self.to == word
    }

    /// The endpoint opposite to `word`; `None` if the edge does not touch it.
    pub fn other(&self, word: &str) -> Option<&str> {
        if self.from == word {
            Some(&self.to)
        } else if self.to == word {
            Some(&self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityGraph {
    pub target: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

/// Read-only view over part of a [`ProximityGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

impl Subgraph {
    pub fn words(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.word.as_str()).collect()
    }
}

/// `(1 - weight/max_weight)^(strength/4) * (1 - nw) + connected^(-nw) * nw`.
///
/// A node without edges contributes `0` for the connectivity term.
pub fn combined_proximity(
    weight: usize,
    max_weight: usize,
    connected_edges: usize,
    neighbor_weight: f64,
    proximity_strength: f64,
) -> f64 {
    let target_proximity = if max_weight == 0 {
        0.0
    } else {
        (1.0 - weight as f64 / max_weight as f64).powf(proximity_strength / 4.0)
    };
    let neighbor_proximity = if connected_edges == 0 {
        0.0
    } else {
        (connected_edges as f64).powf(-neighbor_weight)
    };
    target_proximity * (1.0 - neighbor_weight) + neighbor_proximity * neighbor_weight
}

/// Insertion-ordered word -> weight map.
#[derive(Default)]
struct NodeWeights {
    order: Vec<(String, usize)>,
    position: HashMap<String, usize>,
}

impl NodeWeights {
    fn contains(&self, word: &str) -> bool {
        self.position.contains_key(word)
    }

    fn set(&mut self, word: &str, weight: usize) {
        match self.position.get(word) {
            Some(&idx) => self.order[idx].1 = weight,
            None => {
                self.position.insert(word.to_string(), self.order.len());
                self.order.push((word.to_string(), weight));
            }
        }
    }
}

/// Builds the proximity graph for `target`.
pub fn build_graph(
    extraction: &ContextExtraction,
    target: &str,
    params: &GraphParams,
) -> ProximityGraph {
    let frequency = count_words(&extraction.related_words);
    let top_words: Vec<(String, usize)> = rank_by_frequency(&extraction.related_words)
        .into_iter()
        .take(params.top_words)
        .collect();

    let mut weights = NodeWeights::default();
    weights.set(target, frequency.get(target).copied().unwrap_or(1));
    let mut edges: Vec<Edge> = Vec::new();

    for (word, freq) in &top_words {
        weights.set(word, *freq);
        edges.push(Edge::new(target, word));

        let Some(partners) = extraction.neighbor_index.get(word) else {
            continue;
        };
        for (neighbor, neighbor_freq) in rank_by_frequency(partners)
            .into_iter()
            .take(params.neighbors)
        {
            if !weights.contains(&neighbor) {
                weights.set(&neighbor, neighbor_freq);
            }
            if extraction.lists(&neighbor, word) {
                edges.push(Edge::new(word, &neighbor));
            }
        }
    }

    let max_weight = weights.order.iter().map(|(_, w)| *w).max().unwrap_or(0);
    let nodes: Vec<GraphNode> = weights
        .order
        .into_iter()
        .map(|(word, weight)| {
            let direct_frequency = frequency.get(&word).copied().unwrap_or(0);
            let connected_edges = edges.iter().filter(|e| e.touches(&word)).count();
            let combined = combined_proximity(
                weight,
                max_weight,
                connected_edges,
                params.neighbor_weight,
                params.proximity_strength,
            );
            let label = if word == target {
                word.clone()
            } else {
                format!("{}: {}", word, direct_frequency)
            };
            GraphNode {
                word,
                weight,
                direct_frequency,
                label,
                connected_edges,
                combined,
            }
        })
        .collect();

    debug!(
        "Graph for {:?}: {} nodes, {} edges",
        target,
        nodes.len(),
        edges.len()
    );
    ProximityGraph {
        target: target.to_string(),
        nodes,
        edges,
    }
}

impl ProximityGraph {
    pub fn node(&self, word: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.word == word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.node(word).is_some()
    }

    /// True if an edge joins `a` and `b` in either direction.
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edges
            .iter()
            .any(|e| (e.from == a && e.to == b) || (e.from == b && e.to == a))
    }

    fn subgraph(&self, keep: &HashSet<&str>, edges: Vec<Edge>) -> Subgraph {
        let nodes = self
            .nodes
            .iter()
            .filter(|n| keep.contains(n.word.as_str()))
            .cloned()
            .collect();
        let mut seen = HashSet::new();
        let edges = edges
            .into_iter()
            .filter(|e| keep.contains(e.from.as_str()) && keep.contains(e.to.as_str()))
            .filter(|e| seen.insert(e.clone()))
            .collect();
        Subgraph { nodes, edges }
    }

    /// Everything reachable from `start` without passing through the target.
    ///
    /// The target itself is always part of the result, together with every edge
    /// touching a visited node whose endpoints are both in the result.
    pub fn neighborhood(&self, start: &str) -> Result<Subgraph> {
        if !self.contains(start) {
            return Err(AnalysisError::UnknownNode(start.to_string()));
        }
        let mut visited: HashSet<&str> = HashSet::new();
        let mut to_explore: Vec<&str> = vec![start];
        let mut touched: Vec<Edge> = Vec::new();

        while let Some(current) = to_explore.pop() {
            if !visited.insert(current) {
                continue;
            }
            for edge in self.edges.iter().filter(|e| e.touches(current)) {
                touched.push(edge.clone());
                if let Some(other) = edge.other(current) {
                    if !visited.contains(other) && other != self.target {
                        to_explore.push(other);
                    }
                }
            }
        }

        visited.insert(self.target.as_str());
        Ok(self.subgraph(&visited, touched))
    }

    /// `start`, its immediate neighbors and the target, with only the edges touching `start`.
    pub fn direct_neighbors(&self, start: &str) -> Result<Subgraph> {
        if !self.contains(start) {
            return Err(AnalysisError::UnknownNode(start.to_string()));
        }
        let touching: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| e.touches(start))
            .cloned()
            .collect();

        let mut keep: HashSet<&str> = HashSet::new();
        keep.insert(self.target.as_str());
        keep.insert(start);
        for edge in self.edges.iter().filter(|e| e.touches(start)) {
            for end in [edge.from.as_str(), edge.to.as_str()] {
                if end != self.target && end != start {
                    keep.insert(end);
                }
            }
        }
        Ok(self.subgraph(&keep, touching))
    }
}
