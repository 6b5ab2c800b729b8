//! Density-based clustering with a noise category.
//!
//! DBSCAN over the standardized feature matrix: points with at least
//! `min_samples` neighbors within `eps` (the point itself included, so a
//! group of `min_samples` identical rows is a valid cluster) become cores,
//! density-connected cores merge into clusters, reachable non-cores join as
//! border points, and everything else is noise.
//!
//! Neighbor queries are linear scans; the matrix width is a runtime value
//! and session-sized inputs are thousands of rows, not millions.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::scaling::standardize;
use crate::table::{FeatureMatrix, FeatureTable};

/// Label assigned to points outside every cluster.
pub const NOISE_LABEL: &str = "Noise";

/// Clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Neighborhood radius in standardized feature space.
    pub eps: f64,
    /// Minimum neighborhood size (self included) for a core point; also the
    /// minimum row count for clustering to run at all.
    pub min_samples: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            eps: 0.3,
            min_samples: 10,
        }
    }
}

/// Cluster a feature table, returning one label per row.
///
/// Labels are `"Cluster {k}"` for cluster ids and `"Noise"` for outliers,
/// in input row order. Returns `None` (no labeling) when the table has
/// fewer rows than `min_samples` — clustering degenerates below that size,
/// and a null labeling is the documented contract rather than an error.
pub fn cluster_table(
    table: &FeatureTable,
    feature_cols: &[&str],
    config: &ClusteringConfig,
) -> Option<Vec<String>> {
    if table.rows() < config.min_samples {
        return None;
    }

    let scaled = standardize(&table.select_numeric(feature_cols));
    let assignments = dbscan(&scaled, config.eps, config.min_samples);

    let clusters = assignments.iter().flatten().max().map_or(0, |k| k + 1);
    let noise = assignments.iter().filter(|a| a.is_none()).count();
    debug!(
        "dbscan over {} rows: {} clusters, {} noise",
        table.rows(),
        clusters,
        noise
    );

    Some(
        assignments
            .into_iter()
            .map(|assignment| match assignment {
                Some(k) => format!("Cluster {k}"),
                None => NOISE_LABEL.to_string(),
            })
            .collect(),
    )
}

/// DBSCAN cluster assignment per row; `None` marks noise.
pub fn dbscan(matrix: &FeatureMatrix, eps: f64, min_samples: usize) -> Vec<Option<usize>> {
    let n = matrix.rows;
    let eps_sq = eps * eps;

    let mut visited = vec![false; n];
    let mut assignments: Vec<Option<usize>> = vec![None; n];
    let mut next_cluster = 0usize;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let neighbors = region_query(matrix, i, eps_sq);
        if neighbors.len() < min_samples {
            // Not a core point; stays noise unless a later cluster claims
            // it as a border point.
            continue;
        }

        let cluster = next_cluster;
        next_cluster += 1;
        assignments[i] = Some(cluster);

        // Expand the cluster from the seed neighborhood.
        let mut queue: Vec<usize> = neighbors;
        while let Some(j) = queue.pop() {
            if !visited[j] {
                visited[j] = true;
                let j_neighbors = region_query(matrix, j, eps_sq);
                if j_neighbors.len() >= min_samples {
                    queue.extend(j_neighbors);
                }
            }
            if assignments[j].is_none() {
                assignments[j] = Some(cluster);
            }
        }
    }

    assignments
}

/// Indices within `eps` of row `i`, the row itself included.
fn region_query(matrix: &FeatureMatrix, i: usize, eps_sq: f64) -> Vec<usize> {
    (0..matrix.rows)
        .filter(|&j| matrix.row_distance_sq(i, j) <= eps_sq)
        .collect()
}
