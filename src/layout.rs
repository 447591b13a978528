//! Jittered 3D placement of graph nodes for renderers.
//!
//! Placement is not part of the analytical result: every node gets a random
//! position scaled by its combined proximity, the target is pinned.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::graph::ProximityGraph;

pub const DEFAULT_SCALE: f64 = 10.0;
/// Fixed coordinate of the target node on every axis.
pub const TARGET_COORDINATE: f64 = 0.5;
/// Every axis range covers at least `-5..=5`.
pub const MIN_AXIS_RANGE: (f64, f64) = (-5.0, 5.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub word: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

/// One position per graph node, in node order.
pub fn place(graph: &ProximityGraph, scale: f64, seed: Option<u64>) -> Vec<NodePosition> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    graph
        .nodes
        .iter()
        .map(|node| {
            // the target consumes three draws as well
            let mut jitter = || (rng.random::<f64>() - 0.5) * node.combined * scale;
            let (x, y, z) = (jitter(), jitter(), jitter());
            if node.word == graph.target {
                NodePosition {
                    word: node.word.clone(),
                    x: TARGET_COORDINATE,
                    y: TARGET_COORDINATE,
                    z: TARGET_COORDINATE,
                }
            } else {
                NodePosition {
                    word: node.word.clone(),
                    x,
                    y,
                    z,
                }
            }
        })
        .collect()
}

fn axis(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    (
        (lo - 1.0).min(MIN_AXIS_RANGE.0),
        (hi + 1.0).max(MIN_AXIS_RANGE.1),
    )
}

/// Axis ranges padded by 1 around all positions, never narrower than `MIN_AXIS_RANGE`.
pub fn scene_bounds(positions: &[NodePosition]) -> SceneBounds {
    SceneBounds {
        x: axis(positions.iter().map(|p| p.x)),
        y: axis(positions.iter().map(|p| p.y)),
        z: axis(positions.iter().map(|p| p.z)),
    }
}
