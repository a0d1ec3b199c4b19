//! Dataset: a dense, rectangular matrix of observations.

use crate::error::{ConsensusError, Result};

/// A fixed set of data points, stored row-major.
///
/// Columns are expected to be ordered by importance when the dataset has been
/// pre-reduced (e.g. principal components), so that [`Dataset::leading_columns`]
/// yields a lower-dimensional view of the same points.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<Vec<f64>>,
    n_features: usize,
}

impl Dataset {
    /// Create a dataset from observation rows.
    ///
    /// Rows must be non-empty, equally long and finite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || n_features == 0 {
            return Err(ConsensusError::EmptyData);
        }
        if let Some(row) = rows.iter().find(|r| r.len() != n_features) {
            return Err(ConsensusError::DimensionMismatch {
                expected: n_features,
                got: row.len(),
            });
        }
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ConsensusError::InvalidParameter(
                "dataset contains non-finite values".to_string(),
            ));
        }

        Ok(Self { rows, n_features })
    }

    /// Number of data points.
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Number of features per data point.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Observation rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// A single observation.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Copy of the dataset restricted to its first `n` columns.
    pub fn leading_columns(&self, n: usize) -> Result<Dataset> {
        if n == 0 || n > self.n_features {
            return Err(ConsensusError::InvalidParameter(format!(
                "cannot keep {n} leading columns of a {}-column dataset",
                self.n_features
            )));
        }
        Ok(Dataset {
            rows: self.rows.iter().map(|r| r[..n].to_vec()).collect(),
            n_features: n,
        })
    }
}
