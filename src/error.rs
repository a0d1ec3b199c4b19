//! Error types for the cluster-consensus library.

use crate::grid::ConfigurationKey;
use thiserror::Error;

/// Result type alias for consensus operations.
pub type Result<T> = std::result::Result<T, ConsensusError>;

/// Errors that can occur while aligning labels or sweeping a parameter grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsensusError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Two label vectors have different numbers of distinct clusters.
    #[error(
        "cluster count mismatch: reference has {reference} clusters, candidate has {candidate}"
    )]
    ClusterCountMismatch { reference: usize, candidate: usize },

    /// The parameter grid is empty or conflicts with a reserved parameter.
    #[error("invalid parameter grid: {0}")]
    InvalidParameterGrid(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure reported by a clusterer, quality scorer or assignment solver.
    #[error("external capability failed: {0}")]
    Capability(String),

    /// Evaluation of a single grid point failed.
    #[error("configuration [{key}] failed: {source}")]
    Configuration {
        key: ConfigurationKey,
        #[source]
        source: Box<ConsensusError>,
    },
}

impl ConsensusError {
    /// Attach the grid point being evaluated to an error.
    pub fn for_configuration(self, key: &ConfigurationKey) -> Self {
        ConsensusError::Configuration {
            key: key.clone(),
            source: Box::new(self),
        }
    }

    /// The configuration key attached to this error, if any.
    pub fn configuration_key(&self) -> Option<&ConfigurationKey> {
        match self {
            ConsensusError::Configuration { key, .. } => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ParamValue;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ConsensusError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ConsensusError::ClusterCountMismatch {
            reference: 1,
            candidate: 2,
        };
        assert_eq!(
            err.to_string(),
            "cluster count mismatch: reference has 1 clusters, candidate has 2"
        );

        let err = ConsensusError::DimensionMismatch {
            expected: 4,
            got: 3,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 4, got 3");

        let err = ConsensusError::InvalidParameterGrid("grid is empty".to_string());
        assert_eq!(err.to_string(), "invalid parameter grid: grid is empty");
    }

    #[test]
    fn configuration_errors_carry_key() {
        let key = ConfigurationKey::new(vec![("n_clusters".to_string(), ParamValue::Int(3))]);
        let err = ConsensusError::Capability("diverged".to_string()).for_configuration(&key);

        assert_eq!(err.configuration_key(), Some(&key));
        assert_eq!(
            err.to_string(),
            "configuration [n_clusters=3] failed: external capability failed: diverged"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ConsensusError::EmptyData;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
