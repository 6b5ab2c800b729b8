//! # Chitra-Analytics: Feature Reduction and Clustering
//!
//! Numeric pipeline over per-structure feature tables: standardize the
//! selected feature columns, then either project to a 2-D embedding for
//! visualization or derive density-based cluster labels with a noise
//! category. The two operations are independently invocable and share the
//! preprocessing step.
//!
//! ```text
//!                    ┌────────────────────┐
//!  FeatureTable ───► │ select + standardize│ ──► finite z-scored matrix
//!                    └─────────┬──────────┘
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!     ┌────────────────┐              ┌────────────────┐
//!     │   Embedding    │              │   Clustering   │
//!     │ (fuzzy kNN +   │              │    (DBSCAN)    │
//!     │     SGD)       │              │                │
//!     └───────┬────────┘              └───────┬────────┘
//!             ▼                               ▼
//!     UMAP1/UMAP2 + labels          "Cluster {k}" / "Noise"
//! ```
//!
//! Degenerate inputs are part of the contract, not error cases: missing and
//! zero-variance features standardize to zeros, the embedding accepts any
//! row count, and clustering returns `None` below its minimum sample count.
//! Inputs are read-only; every operation allocates its result.
//!
//! ## Modules
//!
//! - [`table`]: feature tables and matrix selection
//! - [`scaling`]: NaN-tolerant standardization
//! - [`embedding`]: simplified UMAP projection to 2-D
//! - [`clustering`]: DBSCAN labeling

pub mod clustering;
pub mod embedding;
pub mod error;
pub mod scaling;
pub mod table;

pub use clustering::{ClusteringConfig, NOISE_LABEL, cluster_table, dbscan};
pub use embedding::{EMBEDDING_X, EMBEDDING_Y, EmbeddingConfig, embed_table, project};
pub use error::{Error, Result};
pub use scaling::standardize;
pub use table::{Column, ColumnData, FeatureMatrix, FeatureTable};
