//! Parameter sweep over repeated clustering runs.
//!
//! For every grid point the clusterer runs `iterations` times. Costs, quality
//! scores and negative-score fractions are averaged over the runs, and the
//! runs' label vectors are aligned to the first run to derive a consensus
//! labeling.

use super::params::{Configuration, ParameterGrid};
use super::report::{ConfigurationMetrics, GridReport};
use crate::alignment::{AssignmentSolver, ConsensusSequencer, KuhnMunkres, LabelAligner};
use crate::clustering::{Clusterer, KMeans, QualityScorer, Silhouette};
use crate::core::Dataset;
use crate::error::{ConsensusError, Result};
use std::borrow::Cow;

/// What to do when a configuration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the sweep and return the failure.
    #[default]
    Abort,
    /// Record the failure in [`GridReport::failures`] and continue.
    CollectFailures,
}

/// Configuration for [`GridEvaluator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Clustering runs per configuration.
    pub iterations: usize,
    /// `n_init` passed to the clusterer when the grid does not declare it.
    pub default_restarts: usize,
    /// Leading columns to cluster on when the grid does not declare
    /// `n_components`; `None` uses every column.
    pub default_components: Option<usize>,
    /// Failure handling.
    pub failure_policy: FailurePolicy,
    /// Evaluate configurations on the rayon thread pool. Only honored with
    /// the `parallel` feature.
    pub parallel: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            default_restarts: 10,
            default_components: None,
            failure_policy: FailurePolicy::Abort,
            parallel: false,
        }
    }
}

impl EvaluatorConfig {
    /// Set the number of runs per configuration.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the restart count injected when the grid omits `n_init`.
    pub fn with_default_restarts(mut self, restarts: usize) -> Self {
        self.default_restarts = restarts;
        self
    }

    /// Set the column count used when the grid omits `n_components`.
    pub fn with_default_components(mut self, components: usize) -> Self {
        self.default_components = Some(components);
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Evaluate configurations in parallel.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ConsensusError::InvalidParameter(
                "iterations must be positive".to_string(),
            ));
        }
        if self.default_restarts == 0 {
            return Err(ConsensusError::InvalidParameter(
                "default_restarts must be positive".to_string(),
            ));
        }
        if self.default_components == Some(0) {
            return Err(ConsensusError::InvalidParameter(
                "default_components must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sweeps a [`ParameterGrid`] with repeated clustering runs.
///
/// # Example
///
/// ```
/// use cluster_consensus::clustering::{KMeans, KMeansConfig, Silhouette};
/// use cluster_consensus::core::Dataset;
/// use cluster_consensus::grid::{ConfigurationKey, EvaluatorConfig, GridEvaluator, ParameterGrid};
///
/// let data = Dataset::from_rows(vec![
///     vec![0.0, 0.0], vec![0.2, 0.1], vec![0.1, 0.3],
///     vec![9.0, 9.0], vec![9.2, 9.1], vec![9.1, 9.3],
/// ]).unwrap();
/// let grid = ParameterGrid::new().add("n_clusters", [2, 3]);
///
/// let evaluator = GridEvaluator::new(
///     KMeans::new(KMeansConfig::default().seed(1)),
///     Silhouette::default(),
///     EvaluatorConfig::default().with_iterations(3),
/// );
/// let report = evaluator.evaluate(&data, &grid).unwrap();
///
/// assert_eq!(report.len(), 2);
/// let key = ConfigurationKey::from_pairs([("n_clusters", 2)]);
/// assert!(report.quality[&key] > 0.9);
/// ```
#[derive(Debug, Clone)]
pub struct GridEvaluator<C, Q, S = KuhnMunkres> {
    clusterer: C,
    scorer: Q,
    sequencer: ConsensusSequencer<S>,
    config: EvaluatorConfig,
}

impl<C: Clusterer, Q: QualityScorer> GridEvaluator<C, Q, KuhnMunkres> {
    /// Create an evaluator that aligns runs with the Hungarian algorithm.
    pub fn new(clusterer: C, scorer: Q, config: EvaluatorConfig) -> Self {
        Self {
            clusterer,
            scorer,
            sequencer: ConsensusSequencer::new(),
            config,
        }
    }
}

impl<C: Clusterer, Q: QualityScorer, S: AssignmentSolver> GridEvaluator<C, Q, S> {
    /// Create an evaluator with a custom assignment solver.
    pub fn with_solver(clusterer: C, scorer: Q, solver: S, config: EvaluatorConfig) -> Self {
        Self {
            clusterer,
            scorer,
            sequencer: ConsensusSequencer::with_aligner(LabelAligner::with_solver(solver)),
            config,
        }
    }

    /// The evaluator configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate every configuration of `grid` on `dataset`.
    ///
    /// Results are keyed by configuration and do not depend on evaluation
    /// order. Under [`FailurePolicy::Abort`] the first failing configuration
    /// aborts the sweep with a [`ConsensusError::Configuration`] error.
    pub fn evaluate(&self, dataset: &Dataset, grid: &ParameterGrid) -> Result<GridReport> {
        self.config.validate()?;
        let configs = grid.configurations(self.config.default_restarts)?;
        for config in &configs {
            let components = self.components_for(config);
            if components.is_some_and(|n| n > dataset.n_features()) {
                return Err(ConsensusError::InvalidParameterGrid(format!(
                    "[{}] asks for {} components but the dataset has {} columns",
                    config.key,
                    components.unwrap_or_default(),
                    dataset.n_features()
                )));
            }
        }

        log::debug!(
            "evaluating {} configurations x {} iterations",
            configs.len(),
            self.config.iterations
        );

        let mut report = GridReport::new();

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            use rayon::prelude::*;

            let outcomes: Vec<Result<ConfigurationMetrics>> = configs
                .par_iter()
                .map(|config| self.evaluate_configuration(dataset, config))
                .collect();
            for (config, outcome) in configs.iter().zip(outcomes) {
                self.record(&mut report, config, outcome)?;
            }
            return Ok(report);
        }

        for config in &configs {
            let outcome = self.evaluate_configuration(dataset, config);
            self.record(&mut report, config, outcome)?;
        }
        Ok(report)
    }

    /// Run, score and align the repeated runs of a single configuration.
    pub fn evaluate_configuration(
        &self,
        dataset: &Dataset,
        config: &Configuration,
    ) -> Result<ConfigurationMetrics> {
        log::debug!("evaluating configuration [{}]", config.key);

        let data = match self.components_for(config) {
            Some(n) if n < dataset.n_features() => Cow::Owned(dataset.leading_columns(n)?),
            _ => Cow::Borrowed(dataset),
        };

        let n = dataset.n_samples();
        let iterations = self.config.iterations;
        let mut cost_sum = 0.0;
        let mut quality_sum = 0.0;
        let mut negative_sum = 0.0;
        let mut runs = Vec::with_capacity(iterations);

        for run in 0..iterations {
            let result = self.clusterer.cluster(&data, &config.params, run)?;
            if result.labels.len() != n {
                return Err(ConsensusError::Capability(format!(
                    "clusterer returned {} labels for {n} points",
                    result.labels.len()
                )));
            }

            // Quality is judged in the full feature space.
            let scores = self.scorer.sample_scores(dataset, &result.labels)?;
            if scores.len() != n {
                return Err(ConsensusError::Capability(format!(
                    "quality scorer returned {} scores for {n} points",
                    scores.len()
                )));
            }

            cost_sum += result.cost;
            quality_sum += scores.iter().sum::<f64>() / n as f64;
            negative_sum += scores.iter().filter(|&&s| s < 0.0).count() as f64 / n as f64;
            runs.push(result.labels);
        }

        let aligned = self.sequencer.align_sequence(&runs)?;
        let unanimous = aligned.is_unanimous();
        let metrics = ConfigurationMetrics {
            cost: cost_sum / iterations as f64,
            quality: quality_sum / iterations as f64,
            negative_fraction: negative_sum / iterations as f64,
            consensus: aligned.consensus(),
            agreement: aligned.agreement(),
            unanimous,
        };

        log::debug!(
            "configuration [{}]: cost={:.4} quality={:.4} unanimous={}",
            config.key,
            metrics.cost,
            metrics.quality,
            unanimous
        );
        Ok(metrics)
    }

    fn components_for(&self, config: &Configuration) -> Option<usize> {
        config.components.or(self.config.default_components)
    }

    fn record(
        &self,
        report: &mut GridReport,
        config: &Configuration,
        outcome: Result<ConfigurationMetrics>,
    ) -> Result<()> {
        match outcome {
            Ok(metrics) => report.insert(config.key.clone(), metrics),
            Err(e) => match self.config.failure_policy {
                FailurePolicy::Abort => return Err(e.for_configuration(&config.key)),
                FailurePolicy::CollectFailures => {
                    log::warn!("configuration [{}] failed: {}", config.key, e);
                    report.insert_failure(config.key.clone(), e);
                }
            },
        }
        Ok(())
    }
}

/// Sweep `grid` with the bundled k-means clusterer and silhouette scorer.
pub fn evaluate_grid(
    dataset: &Dataset,
    grid: &ParameterGrid,
    iterations: usize,
) -> Result<GridReport> {
    GridEvaluator::new(
        KMeans::default(),
        Silhouette::default(),
        EvaluatorConfig::default().with_iterations(iterations),
    )
    .evaluate(dataset, grid)
}
