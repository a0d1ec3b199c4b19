//! Silhouette coefficients.
//!
//! For point `i` with mean intra-cluster distance `a(i)` and mean distance
//! to the nearest other cluster `b(i)`, the silhouette is
//! `(b(i) - a(i)) / max(a(i), b(i))`. Points alone in their cluster score 0.

use super::distance::DistanceMetric;
use super::traits::QualityScorer;
use crate::core::Dataset;
use crate::error::{ConsensusError, Result};
use std::collections::BTreeMap;

/// Silhouette scorer over a configurable distance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silhouette {
    metric: DistanceMetric,
}

impl Silhouette {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }
}

impl QualityScorer for Silhouette {
    fn sample_scores(&self, data: &Dataset, labels: &[usize]) -> Result<Vec<f64>> {
        silhouette_samples(data.rows(), labels, self.metric)
    }
}

/// Silhouette coefficient of every point.
///
/// # Errors
/// Fails with [`ConsensusError::Capability`] unless the number of distinct
/// labels lies in `2..=n-1`.
pub fn silhouette_samples(
    points: &[Vec<f64>],
    labels: &[usize],
    metric: DistanceMetric,
) -> Result<Vec<f64>> {
    let n = points.len();
    if labels.len() != n {
        return Err(ConsensusError::DimensionMismatch {
            expected: n,
            got: labels.len(),
        });
    }

    // Cluster label -> dense index
    let mut index: BTreeMap<usize, usize> = BTreeMap::new();
    for &l in labels {
        let next = index.len();
        index.entry(l).or_insert(next);
    }
    let k = index.len();
    if k < 2 || k >= n {
        return Err(ConsensusError::Capability(format!(
            "silhouette is defined for 2..={} clusters, got {k}",
            n.saturating_sub(1)
        )));
    }

    let dense: Vec<usize> = labels.iter().map(|l| index[l]).collect();
    let mut sizes = vec![0usize; k];
    for &c in &dense {
        sizes[c] += 1;
    }

    let mut scores = Vec::with_capacity(n);
    let mut sums = vec![0.0; k];
    for i in 0..n {
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[dense[j]] += metric.distance(&points[i], &points[j]);
            }
        }

        let own = dense[i];
        if sizes[own] == 1 {
            scores.push(0.0);
            continue;
        }
        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        scores.push(if denom > 0.0 { (b - a) / denom } else { 0.0 });
    }

    Ok(scores)
}

/// Mean silhouette coefficient.
pub fn silhouette_score(points: &[Vec<f64>], labels: &[usize], metric: DistanceMetric) -> Result<f64> {
    let scores = silhouette_samples(points, labels, metric)?;
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn well_separated_clusters_score_high() {
        let points = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];
        let scores = silhouette_samples(&points, &[0, 0, 1, 1], DistanceMetric::Euclidean).unwrap();

        // a = 1, b = mean(10, 11) = 10.5 for point 0
        assert_relative_eq!(scores[0], 9.5 / 10.5, epsilon = 1e-12);
        assert!(scores.iter().all(|&s| s > 0.8));
    }

    #[test]
    fn misassigned_point_scores_negative() {
        let points = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0], vec![0.5]];
        let scores =
            silhouette_samples(&points, &[0, 0, 1, 1, 1], DistanceMetric::Euclidean).unwrap();

        assert!(scores[4] < 0.0);
    }

    #[test]
    fn singleton_clusters_score_zero() {
        let points = vec![vec![0.0], vec![1.0], vec![10.0]];
        let scores = silhouette_samples(&points, &[0, 0, 1], DistanceMetric::Euclidean).unwrap();

        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn labels_need_not_be_contiguous() {
        let points = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];
        let a = silhouette_score(&points, &[0, 0, 1, 1], DistanceMetric::Euclidean).unwrap();
        let b = silhouette_score(&points, &[7, 7, 3, 3], DistanceMetric::Euclidean).unwrap();

        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_cluster_counts_fail() {
        let points = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert!(matches!(
            silhouette_samples(&points, &[0, 0, 0], DistanceMetric::Euclidean),
            Err(ConsensusError::Capability(_))
        ));
        assert!(matches!(
            silhouette_samples(&points, &[0, 1, 2], DistanceMetric::Euclidean),
            Err(ConsensusError::Capability(_))
        ));
    }

    #[test]
    fn scorer_uses_dataset_rows() {
        let data = Dataset::from_rows(vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]]).unwrap();
        let score = Silhouette::default().score(&data, &[0, 0, 1, 1]).unwrap();

        assert!(score > 0.8);
    }

    #[test]
    fn length_mismatch_fails() {
        let points = vec![vec![0.0], vec![1.0]];
        assert!(matches!(
            silhouette_samples(&points, &[0], DistanceMetric::Euclidean),
            Err(ConsensusError::DimensionMismatch { .. })
        ));
    }
}
