//! Aggregated sweep results keyed by configuration.

use super::params::ConfigurationKey;
use crate::error::ConsensusError;
use std::collections::BTreeMap;

/// Aggregated metrics of one configuration over its repeated runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationMetrics {
    /// Mean clustering cost.
    pub cost: f64,
    /// Mean quality score, computed on the full dataset.
    pub quality: f64,
    /// Mean per-run fraction of points with a negative quality score.
    pub negative_fraction: f64,
    /// Consensus labeling, numbered like the first run.
    pub consensus: Vec<usize>,
    /// Mean fraction of runs agreeing with the consensus per point.
    pub agreement: f64,
    /// Whether all runs found the same partition.
    pub unanimous: bool,
}

/// Result of a parameter sweep.
///
/// Every numeric mapping holds exactly the keys of the configurations that
/// evaluated successfully. Keys of failed configurations appear only in
/// [`GridReport::failures`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridReport {
    /// Mean cost per configuration.
    pub cost: BTreeMap<ConfigurationKey, f64>,
    /// Mean quality per configuration.
    pub quality: BTreeMap<ConfigurationKey, f64>,
    /// Mean negative-score fraction per configuration.
    pub negative_fraction: BTreeMap<ConfigurationKey, f64>,
    /// Consensus labels per configuration.
    pub consensus: BTreeMap<ConfigurationKey, Vec<usize>>,
    /// Run agreement per configuration.
    pub agreement: BTreeMap<ConfigurationKey, f64>,
    /// Configurations that failed, when failures are collected.
    pub failures: BTreeMap<ConfigurationKey, ConsensusError>,
}

impl GridReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the metrics of a successful configuration in every mapping.
    pub fn insert(&mut self, key: ConfigurationKey, metrics: ConfigurationMetrics) {
        self.cost.insert(key.clone(), metrics.cost);
        self.quality.insert(key.clone(), metrics.quality);
        self.negative_fraction
            .insert(key.clone(), metrics.negative_fraction);
        self.agreement.insert(key.clone(), metrics.agreement);
        self.consensus.insert(key, metrics.consensus);
    }

    /// Record a failed configuration.
    pub fn insert_failure(&mut self, key: ConfigurationKey, error: ConsensusError) {
        self.failures.insert(key, error);
    }

    /// Keys of successfully evaluated configurations, ascending.
    pub fn keys(&self) -> impl Iterator<Item = &ConfigurationKey> {
        self.cost.keys()
    }

    /// Number of successfully evaluated configurations.
    pub fn len(&self) -> usize {
        self.cost.len()
    }

    /// Check if no configuration succeeded.
    pub fn is_empty(&self) -> bool {
        self.cost.is_empty()
    }

    /// Check if every mapping holds the same key set.
    pub fn is_consistent(&self) -> bool {
        let keys: Vec<&ConfigurationKey> = self.cost.keys().collect();
        self.quality.keys().eq(keys.iter().copied())
            && self.negative_fraction.keys().eq(keys.iter().copied())
            && self.consensus.keys().eq(keys.iter().copied())
            && self.agreement.keys().eq(keys.iter().copied())
            && self.failures.keys().all(|k| !self.cost.contains_key(k))
    }

    /// All metrics of one configuration.
    pub fn metrics(&self, key: &ConfigurationKey) -> Option<ConfigurationMetrics> {
        let consensus = self.consensus.get(key)?;
        let agreement = *self.agreement.get(key)?;
        Some(ConfigurationMetrics {
            cost: *self.cost.get(key)?,
            quality: *self.quality.get(key)?,
            negative_fraction: *self.negative_fraction.get(key)?,
            unanimous: agreement >= 1.0,
            consensus: consensus.clone(),
            agreement,
        })
    }

    /// Configuration with the highest mean quality.
    pub fn best_by_quality(&self) -> Option<(&ConfigurationKey, f64)> {
        self.quality
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, &q)| (k, q))
    }
}
