//! Contingency (co-occurrence) matrix between two partitions.

use crate::error::{ConsensusError, Result};
use std::collections::BTreeSet;

/// Cross-tabulation of two label vectors.
///
/// `counts()[i][j]` is the number of points labeled `row_labels()[i]` in the
/// reference and `col_labels()[j]` in the candidate. Both label axes are
/// sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyMatrix {
    row_labels: Vec<usize>,
    col_labels: Vec<usize>,
    counts: Vec<Vec<usize>>,
}

impl ContingencyMatrix {
    /// Build the contingency matrix of `reference` against `candidate`.
    ///
    /// Fails if the vectors differ in length, are empty, or contain a
    /// different number of distinct labels.
    pub fn new(reference: &[usize], candidate: &[usize]) -> Result<Self> {
        if reference.is_empty() {
            return Err(ConsensusError::EmptyData);
        }
        if reference.len() != candidate.len() {
            return Err(ConsensusError::DimensionMismatch {
                expected: reference.len(),
                got: candidate.len(),
            });
        }

        let row_labels = distinct(reference);
        let col_labels = distinct(candidate);
        if row_labels.len() != col_labels.len() {
            return Err(ConsensusError::ClusterCountMismatch {
                reference: row_labels.len(),
                candidate: col_labels.len(),
            });
        }

        let k = row_labels.len();
        let mut counts = vec![vec![0usize; k]; k];
        for (r, c) in reference.iter().zip(candidate) {
            // Both labels come from the sorted distinct sets built above.
            let i = row_labels.binary_search(r).unwrap_or_default();
            let j = col_labels.binary_search(c).unwrap_or_default();
            counts[i][j] += 1;
        }

        Ok(Self {
            row_labels,
            col_labels,
            counts,
        })
    }

    /// Number of clusters on each axis.
    pub fn size(&self) -> usize {
        self.row_labels.len()
    }

    /// Distinct reference labels, ascending.
    pub fn row_labels(&self) -> &[usize] {
        &self.row_labels
    }

    /// Distinct candidate labels, ascending.
    pub fn col_labels(&self) -> &[usize] {
        &self.col_labels
    }

    /// Raw co-occurrence counts.
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> usize {
        (0..self.size()).map(|i| self.counts[i][i]).sum()
    }

    /// Counts as signed weights for an assignment solver.
    pub fn weights(&self) -> Vec<Vec<i64>> {
        self.counts
            .iter()
            .map(|row| row.iter().map(|&c| c as i64).collect())
            .collect()
    }
}

/// Number of distinct labels in a label vector.
pub fn cluster_count(labels: &[usize]) -> usize {
    labels.iter().collect::<BTreeSet<_>>().len()
}

fn distinct(labels: &[usize]) -> Vec<usize> {
    labels
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
