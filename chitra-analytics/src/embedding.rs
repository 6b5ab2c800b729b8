//! 2-D neighborhood embedding for visualization.
//!
//! A simplified UMAP (Uniform Manifold Approximation and Projection)
//! suitable for interactive use: it builds a fuzzy k-nearest-neighbor graph
//! over the standardized feature matrix and optimizes a 2-D layout with
//! stochastic gradient descent, attracting connected pairs and repelling
//! sampled non-neighbors. The embedding is for visual grouping only, not for
//! downstream numeric analysis.
//!
//! # Algorithm
//!
//! 1. k-nearest neighbors per row (brute-force scan; the matrix width is a
//!    runtime value, so no fixed-dimension index applies)
//! 2. fuzzy membership strengths with a per-row bandwidth `sigma`, found by
//!    binary search so the membership sum approximates `log2(k)`
//! 3. symmetrization `p + q - p*q` into an undirected weighted edge list
//! 4. deterministic layout initialization, then SGD over the edges with
//!    negative sampling; repulsive steps are clamped to keep single updates
//!    from destabilizing the layout
//!
//! Determinism: the RNG is seeded from the config, edges are processed in
//! sorted order, and initialization is closed-form, so a given input and
//! config always produce the same embedding.

use std::collections::HashMap;

use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::scaling::standardize;
use crate::table::{Column, FeatureTable, FeatureMatrix};

/// Name of the first embedding output column.
pub const EMBEDDING_X: &str = "UMAP1";
/// Name of the second embedding output column.
pub const EMBEDDING_Y: &str = "UMAP2";

/// Maximum magnitude of one repulsive SGD step.
const REPULSION_CLAMP: f64 = 4.0;

/// Weights below this threshold are dropped from the fuzzy graph.
const MIN_EDGE_WEIGHT: f64 = 1e-10;

/// Embedding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Neighbors per row in the fuzzy graph.
    pub n_neighbors: usize,
    /// SGD epochs.
    pub n_epochs: usize,
    /// Initial learning rate, decayed linearly per epoch.
    pub learning_rate: f64,
    /// Negative samples drawn per edge per epoch.
    pub negative_sample_rate: usize,
    /// RNG seed for reproducible layouts.
    pub seed: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 15,
            n_epochs: 200,
            learning_rate: 1.0,
            negative_sample_rate: 5,
            seed: 42,
        }
    }
}

/// Embed a feature table to 2-D and re-join the pass-through columns.
///
/// The requested feature columns that exist in the table are standardized
/// and projected; the result carries the two embedding columns (named
/// [`EMBEDDING_X`] and [`EMBEDDING_Y`]) followed by the requested label and
/// custom-data columns in caller order. Row order and identity match the
/// input table exactly: output row `i` is input row `i`.
///
/// There is no minimum row count; empty tables embed to an empty result and
/// a single row lands at the origin.
pub fn embed_table(
    table: &FeatureTable,
    feature_cols: &[&str],
    label_and_custom_cols: &[&str],
    config: &EmbeddingConfig,
) -> FeatureTable {
    let scaled = standardize(&table.select_numeric(feature_cols));
    let coords = project(&scaled, config);

    let mut columns = Vec::with_capacity(2 + label_and_custom_cols.len());
    columns.push(Column::numeric(
        EMBEDDING_X,
        coords.iter().map(|c| c[0]).collect(),
    ));
    columns.push(Column::numeric(
        EMBEDDING_Y,
        coords.iter().map(|c| c[1]).collect(),
    ));
    columns.extend(table.select_columns(label_and_custom_cols));

    // Columns all share the input row count, so this cannot fail.
    FeatureTable::from_columns(columns).unwrap_or_default()
}

/// Project a standardized matrix to one 2-D coordinate pair per row.
pub fn project(matrix: &FeatureMatrix, config: &EmbeddingConfig) -> Vec<[f64; 2]> {
    let n = matrix.rows;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![[0.0, 0.0]];
    }

    let k = config.n_neighbors.min(n - 1).max(1);
    let knn = nearest_neighbors(matrix, k);
    let edges = fuzzy_edges(&knn, k, n);
    debug!("fuzzy graph: {} edges over {} rows (k = {})", edges.len(), n, k);
    let mut embedding = initial_layout(matrix, n);

    optimize(&mut embedding, &edges, n, config);
    embedding
}

/// Brute-force k-nearest neighbors per row, sorted by distance.
fn nearest_neighbors(matrix: &FeatureMatrix, k: usize) -> Vec<Vec<(usize, f64)>> {
    let n = matrix.rows;
    let mut knn = Vec::with_capacity(n);
    for i in 0..n {
        let mut neighbors: Vec<(usize, f64)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, matrix.row_distance_sq(i, j).sqrt()))
            .collect();
        neighbors.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        neighbors.truncate(k);
        knn.push(neighbors);
    }
    knn
}

/// Fuzzy membership strengths, symmetrized into a sorted undirected edge
/// list.
fn fuzzy_edges(knn: &[Vec<(usize, f64)>], k: usize, n: usize) -> Vec<(usize, usize, f64)> {
    let target = (k as f64).ln() / std::f64::consts::LN_2;

    // Fuzzy union p + q - p*q accumulated per undirected pair; the identity
    // value 0 makes one-sided edges come out as their single weight.
    let mut merged: HashMap<(usize, usize), f64> = HashMap::with_capacity(n * k);
    for (i, neighbors) in knn.iter().enumerate() {
        let rho = neighbors.first().map(|&(_, d)| d).unwrap_or(0.0);
        let sigma = find_sigma(neighbors, rho, target);

        for &(j, d) in neighbors {
            let w = if d <= rho {
                1.0
            } else {
                (-(d - rho) / sigma).exp()
            };
            let key = (i.min(j), i.max(j));
            let entry = merged.entry(key).or_insert(0.0);
            *entry = *entry + w - *entry * w;
        }
    }

    let mut edges: Vec<(usize, usize, f64)> = merged
        .into_iter()
        .filter(|&(_, w)| w > MIN_EDGE_WEIGHT)
        .map(|((i, j), w)| (i, j, w))
        .collect();
    // HashMap order is arbitrary; sort for a deterministic SGD schedule.
    edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    edges
}

/// Binary search for the bandwidth `sigma` whose membership sum matches the
/// target (`log2(k)`).
fn find_sigma(neighbors: &[(usize, f64)], rho: f64, target: f64) -> f64 {
    let mut lo = 1e-10_f64;
    let mut hi = 100.0_f64;

    for _ in 0..64 {
        let mid = (lo + hi) / 2.0;
        let sum: f64 = neighbors
            .iter()
            .map(|&(_, d)| {
                if d <= rho {
                    1.0
                } else {
                    (-(d - rho) / mid).exp()
                }
            })
            .sum();
        if sum > target {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    (lo + hi) / 2.0
}

/// Deterministic initial layout: rows on a circle, radius modulated by the
/// first feature so similar rows start near each other.
fn initial_layout(matrix: &FeatureMatrix, n: usize) -> Vec<[f64; 2]> {
    let scale = 10.0;
    (0..n)
        .map(|i| {
            let feature = if matrix.cols > 0 {
                matrix.get(i, 0).abs().min(1.0)
            } else {
                0.0
            };
            let angle = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
            let r = scale * (0.5 + 0.5 * feature);
            [r * angle.cos(), r * angle.sin()]
        })
        .collect()
}

/// SGD over the fuzzy graph: attract edge endpoints, repel sampled
/// non-neighbor pairs.
fn optimize(
    embedding: &mut [[f64; 2]],
    edges: &[(usize, usize, f64)],
    n: usize,
    config: &EmbeddingConfig,
) {
    let adjacency: std::collections::HashSet<(usize, usize)> =
        edges.iter().map(|&(i, j, _)| (i, j)).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);

    for epoch in 0..config.n_epochs {
        let lr =
            config.learning_rate * (1.0 - epoch as f64 / config.n_epochs as f64).max(0.001);

        // Attractive forces along edges (output-space kernel 1/(1 + d²)).
        for &(i, j, w) in edges {
            let dx = embedding[i][0] - embedding[j][0];
            let dy = embedding[i][1] - embedding[j][1];
            let dist_sq = dx * dx + dy * dy + 1e-10;
            let grad = -2.0 / (1.0 + dist_sq);
            let force = w * grad * lr;
            embedding[i][0] += force * dx;
            embedding[i][1] += force * dy;
            embedding[j][0] -= force * dx;
            embedding[j][1] -= force * dy;
        }

        // Repulsive forces on sampled non-neighbor pairs.
        let n_neg = (config.negative_sample_rate * edges.len()).min(n.saturating_mul(n));
        for _ in 0..n_neg {
            let i = rng.random_range(0..n);
            let j = rng.random_range(0..n);
            if i == j || adjacency.contains(&(i.min(j), i.max(j))) {
                continue;
            }
            let dx = embedding[i][0] - embedding[j][0];
            let dy = embedding[i][1] - embedding[j][1];
            let dist_sq = dx * dx + dy * dy + 1e-10;
            let grad = 2.0 / ((0.001 + dist_sq) * (1.0 + dist_sq));
            let force = grad * lr;
            embedding[i][0] += (force * dx).clamp(-REPULSION_CLAMP, REPULSION_CLAMP);
            embedding[i][1] += (force * dy).clamp(-REPULSION_CLAMP, REPULSION_CLAMP);
        }
    }
}
