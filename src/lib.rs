//! # cluster-consensus
//!
//! Comparing repeated runs of a partitioning algorithm such as k-means.
//!
//! Cluster numbering is arbitrary, so two runs that find the same partition
//! can still disagree on every label. This crate aligns label vectors with an
//! optimal (Hungarian) relabeling, derives a consensus labeling from repeated
//! runs, and sweeps hyperparameter grids while averaging cost and quality
//! metrics per configuration.
//!
//! Enable the `parallel` feature to evaluate grid configurations on the rayon
//! thread pool.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::needless_range_loop)]

pub mod alignment;
pub mod clustering;
pub mod core;
pub mod error;
pub mod grid;

pub use error::{ConsensusError, Result};

pub mod prelude {
    pub use crate::alignment::{
        align, align_sequence, relabel, AlignedLabelMatrix, AlignmentMapping,
    };
    pub use crate::clustering::{
        ClusterRun, Clusterer, KMeans, KMeansConfig, QualityScorer, Silhouette,
    };
    pub use crate::core::Dataset;
    pub use crate::error::{ConsensusError, Result};
    pub use crate::grid::{
        evaluate_grid, ConfigurationKey, EvaluatorConfig, FailurePolicy, GridEvaluator, GridReport,
        ParameterGrid,
    };
}
