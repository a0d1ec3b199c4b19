//! K-means clustering of feature vectors.
//!
//! Lloyd iterations from k-means++ seeds, repeated `n_init` times; the run
//! with the lowest inertia wins.

use super::distance::squared_euclidean_distance;
use super::traits::{ClusterRun, Clusterer};
use crate::core::Dataset;
use crate::error::{ConsensusError, Result};
use crate::grid::{ClusterParams, N_CLUSTERS, N_INIT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// K-means configuration.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Number of k-means++ restarts; the best run is kept
    pub n_init: usize,
    /// Maximum Lloyd iterations per restart
    pub max_iter: usize,
    /// Convergence tolerance on inertia
    pub tolerance: f64,
    /// Random seed for initialization
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
            seed: None,
        }
    }
}

impl KMeansConfig {
    /// Set number of clusters.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set number of restarts.
    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set maximum iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// K-means clustering result.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster assignments for each point (0-indexed)
    pub labels: Vec<usize>,
    /// Cluster centroids
    pub centroids: Vec<Vec<f64>>,
    /// Inertia (sum of squared distances to the nearest centroid)
    pub inertia: f64,
    /// Lloyd iterations performed by the winning restart
    pub n_iter: usize,
}

impl KMeansResult {
    /// Get indices of points in a specific cluster.
    pub fn cluster_members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Get the size of each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let k = self.centroids.len();
        let mut sizes = vec![0; k];
        for &label in &self.labels {
            if label < k {
                sizes[label] += 1;
            }
        }
        sizes
    }
}

/// Perform k-means clustering.
///
/// # Arguments
/// * `points` - Data points, all of the same dimension
/// * `config` - K-means configuration
pub fn kmeans(points: &[Vec<f64>], config: &KMeansConfig) -> Result<KMeansResult> {
    let n = points.len();
    if n == 0 {
        return Err(ConsensusError::EmptyData);
    }
    if config.k == 0 || config.k > n {
        return Err(ConsensusError::InvalidParameter(format!(
            "k must be in 1..={n}, got {}",
            config.k
        )));
    }
    if config.n_init == 0 {
        return Err(ConsensusError::InvalidParameter(
            "n_init must be positive".to_string(),
        ));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut best: Option<KMeansResult> = None;
    for _ in 0..config.n_init {
        let result = lloyd(points, config, &mut rng);
        if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
            best = Some(result);
        }
    }

    best.ok_or(ConsensusError::EmptyData)
}

/// One restart: k-means++ seeding followed by Lloyd iterations.
fn lloyd(points: &[Vec<f64>], config: &KMeansConfig, rng: &mut StdRng) -> KMeansResult {
    let n = points.len();
    let k = config.k;

    let mut centroids = initialize_centroids(points, k, rng);
    let mut labels = vec![0; n];
    let mut prev_inertia = f64::INFINITY;
    let mut n_iter = 0;

    for iter in 0..config.max_iter {
        n_iter = iter + 1;

        // Assignment step
        let mut inertia = 0.0;
        for (i, p) in points.iter().enumerate() {
            let (nearest, dist) = find_nearest_centroid(p, &centroids);
            labels[i] = nearest;
            inertia += dist;
        }

        // Check convergence
        if (prev_inertia - inertia).abs() < config.tolerance {
            break;
        }
        prev_inertia = inertia;

        // Update step
        centroids = update_centroids(points, &mut labels, &centroids);
    }

    for (i, p) in points.iter().enumerate() {
        labels[i] = find_nearest_centroid(p, &centroids).0;
    }
    let inertia = compute_inertia(points, &labels, &centroids);

    KMeansResult {
        labels,
        centroids,
        inertia,
        n_iter,
    }
}

/// Initialize centroids using the k-means++ algorithm.
fn initialize_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    for _ in 1..k {
        // Squared distance to the nearest chosen centroid
        let distances: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_euclidean_distance(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let sum: f64 = distances.iter().sum();
        let selected = if sum > 0.0 {
            let threshold = rng.gen::<f64>() * sum;
            let mut cumsum = 0.0;
            distances
                .iter()
                .position(|&d| {
                    cumsum += d;
                    cumsum >= threshold
                })
                .unwrap_or(n - 1)
        } else {
            // All points coincide with existing centroids
            rng.gen_range(0..n)
        };

        centroids.push(points[selected].clone());
    }

    centroids
}

/// Find the nearest centroid and its squared distance.
fn find_nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut min_dist = f64::INFINITY;
    let mut nearest = 0;

    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_euclidean_distance(point, centroid);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }

    (nearest, min_dist)
}

/// Recompute centroids as cluster means.
///
/// An empty cluster is moved onto the point farthest from its current
/// centroid, and that point is reassigned to it.
fn update_centroids(
    points: &[Vec<f64>],
    labels: &mut [usize],
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let k = previous.len();
    let dim = points[0].len();
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (p, &l) in points.iter().zip(labels.iter()) {
        counts[l] += 1;
        for (s, v) in sums[l].iter_mut().zip(p) {
            *s += v;
        }
    }

    let mut centroids: Vec<Vec<f64>> = sums
        .into_iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count == 0 {
                prev.clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect();

    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }
        let farthest = points
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] > 1)
            .map(|(i, p)| (i, squared_euclidean_distance(p, &centroids[labels[i]])))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        if let Some(i) = farthest {
            counts[labels[i]] -= 1;
            labels[i] = cluster;
            counts[cluster] = 1;
            centroids[cluster] = points[i].clone();
        }
    }

    centroids
}

/// Compute inertia (total within-cluster sum of squared distances).
fn compute_inertia(points: &[Vec<f64>], labels: &[usize], centroids: &[Vec<f64>]) -> f64 {
    points
        .iter()
        .zip(labels.iter())
        .map(|(p, &l)| squared_euclidean_distance(p, &centroids[l]))
        .sum()
}

/// Elbow method helper: compute inertia for different k values.
pub fn elbow_inertias(points: &[Vec<f64>], max_k: usize, seed: u64) -> Result<Vec<f64>> {
    (1..=max_k.min(points.len()))
        .map(|k| {
            let config = KMeansConfig::default().k(k).seed(seed);
            kmeans(points, &config).map(|r| r.inertia)
        })
        .collect()
}

/// K-means as a [`Clusterer`] for parameter sweeps.
///
/// Reads `n_clusters` (required) and `n_init` from the call parameters,
/// falling back to the base configuration for everything else. Each run is
/// seeded with `base seed + run`, so repeated runs of one configuration start
/// from different centroids. The base seed is the configured seed, or one
/// drawn from entropy when the clusterer is built; clones share it.
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
    base_seed: u64,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        let base_seed = config
            .seed
            .unwrap_or_else(|| StdRng::from_entropy().gen());
        Self { config, base_seed }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Seed of run 0.
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(KMeansConfig::default())
    }
}

impl Clusterer for KMeans {
    fn cluster(&self, data: &Dataset, params: &ClusterParams, run: usize) -> Result<ClusterRun> {
        let k = params.get_usize(N_CLUSTERS).ok_or_else(|| {
            ConsensusError::Capability(format!("k-means requires an integer '{N_CLUSTERS}'"))
        })?;
        let n_init = params.get_usize(N_INIT).unwrap_or(self.config.n_init);
        let seed = self.base_seed.wrapping_add(run as u64);

        let config = self.config.clone().k(k).n_init(n_init).seed(seed);
        let result = kmeans(data.rows(), &config)
            .map_err(|e| ConsensusError::Capability(format!("k-means: {e}")))?;

        Ok(ClusterRun::new(result.labels, result.inertia))
    }
}
