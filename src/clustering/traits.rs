//! Capability traits for the clustering and quality-scoring collaborators.

use crate::core::Dataset;
use crate::error::{ConsensusError, Result};
use crate::grid::ClusterParams;

/// Output of a single clustering call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRun {
    /// Cluster label per data point.
    pub labels: Vec<usize>,
    /// Inertia-like cost reported by the algorithm.
    pub cost: f64,
}

impl ClusterRun {
    pub fn new(labels: Vec<usize>, cost: f64) -> Self {
        Self { labels, cost }
    }
}

/// A partitioning algorithm treated as a black box.
///
/// `run` is the 0-based repetition index within one configuration; seeded
/// implementations should derive their seed from it so that repeated runs
/// differ but the whole sweep stays reproducible.
///
/// Closures with the same signature implement this trait.
pub trait Clusterer: Send + Sync {
    /// Partition `data` using `params`.
    fn cluster(&self, data: &Dataset, params: &ClusterParams, run: usize) -> Result<ClusterRun>;
}

impl<F> Clusterer for F
where
    F: Fn(&Dataset, &ClusterParams, usize) -> Result<ClusterRun> + Send + Sync,
{
    fn cluster(&self, data: &Dataset, params: &ClusterParams, run: usize) -> Result<ClusterRun> {
        self(data, params, run)
    }
}

/// Per-sample quality of a partition, silhouette-style.
///
/// Scores lie in `[-1, 1]`; negative values flag likely misassignments.
pub trait QualityScorer: Send + Sync {
    /// Score every data point.
    fn sample_scores(&self, data: &Dataset, labels: &[usize]) -> Result<Vec<f64>>;

    /// Aggregate score: the mean of the per-sample scores.
    fn score(&self, data: &Dataset, labels: &[usize]) -> Result<f64> {
        let scores = self.sample_scores(data, labels)?;
        if scores.is_empty() {
            return Err(ConsensusError::EmptyData);
        }
        Ok(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

impl<F> QualityScorer for F
where
    F: Fn(&Dataset, &[usize]) -> Result<Vec<f64>> + Send + Sync,
{
    fn sample_scores(&self, data: &Dataset, labels: &[usize]) -> Result<Vec<f64>> {
        self(data, labels)
    }
}
