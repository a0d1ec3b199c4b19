//! Clustering and quality-scoring capabilities.
//!
//! The sweep evaluator only sees the [`Clusterer`] and [`QualityScorer`]
//! traits. This module also bundles a k-means clusterer and a silhouette
//! scorer so sweeps can run without external collaborators.
//!
//! # Example
//!
//! ```
//! use cluster_consensus::clustering::{kmeans, silhouette_score, DistanceMetric, KMeansConfig};
//!
//! let points = vec![
//!     vec![1.0, 2.0],
//!     vec![1.1, 2.1],
//!     vec![10.0, 11.0],
//!     vec![10.1, 11.1],
//! ];
//! let config = KMeansConfig::default().k(2).seed(42);
//! let result = kmeans(&points, &config).unwrap();
//! assert_eq!(result.centroids.len(), 2);
//!
//! let score = silhouette_score(&points, &result.labels, DistanceMetric::Euclidean).unwrap();
//! assert!(score > 0.9);
//! ```

pub mod distance;
pub mod kmeans;
pub mod silhouette;
pub mod traits;

pub use distance::{
    euclidean_distance, manhattan_distance, squared_euclidean_distance, DistanceMetric,
};
pub use kmeans::{elbow_inertias, kmeans, KMeans, KMeansConfig, KMeansResult};
pub use silhouette::{silhouette_samples, silhouette_score, Silhouette};
pub use traits::{ClusterRun, Clusterer, QualityScorer};
