//! Optimal relabeling of one partition against a reference partition.
//!
//! Clustering algorithms number their clusters arbitrarily, so two runs that
//! find the same partition may still disagree on every label. The aligner
//! finds the one-to-one renaming of the candidate's labels that maximizes the
//! number of points sharing a label with the reference.

use super::contingency::ContingencyMatrix;
use super::solver::{AssignmentSolver, KuhnMunkres, Objective};
use crate::error::{ConsensusError, Result};
use std::collections::HashMap;

/// A bijection from candidate labels to reference labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMapping {
    pairs: Vec<LabelPair>,
}

/// One entry of an [`AlignmentMapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPair {
    /// Label in the reference numbering.
    pub desired: usize,
    /// Label in the candidate numbering that is renamed to `desired`.
    pub current: usize,
}

impl AlignmentMapping {
    /// Build a mapping from `(desired, current)` pairs.
    ///
    /// Both sides must be free of duplicates for the mapping to be a bijection.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let pairs: Vec<LabelPair> = pairs
            .into_iter()
            .map(|(desired, current)| LabelPair { desired, current })
            .collect();

        let mut desired: Vec<usize> = pairs.iter().map(|p| p.desired).collect();
        let mut current: Vec<usize> = pairs.iter().map(|p| p.current).collect();
        desired.sort_unstable();
        desired.dedup();
        current.sort_unstable();
        current.dedup();
        if desired.len() != pairs.len() || current.len() != pairs.len() {
            return Err(ConsensusError::InvalidParameter(
                "alignment mapping must be one-to-one".to_string(),
            ));
        }

        Ok(Self { pairs })
    }

    /// The identity mapping over the given labels.
    pub fn identity(labels: impl IntoIterator<Item = usize>) -> Self {
        Self {
            pairs: labels
                .into_iter()
                .map(|l| LabelPair {
                    desired: l,
                    current: l,
                })
                .collect(),
        }
    }

    /// Mapping entries, ordered by reference label.
    pub fn pairs(&self) -> &[LabelPair] {
        &self.pairs
    }

    /// Number of clusters covered by the mapping.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Check if every label maps to itself.
    pub fn is_identity(&self) -> bool {
        self.pairs.iter().all(|p| p.desired == p.current)
    }

    /// Reference label for a candidate label, if mapped.
    pub fn desired_for(&self, current: usize) -> Option<usize> {
        self.pairs
            .iter()
            .find(|p| p.current == current)
            .map(|p| p.desired)
    }
}

/// Aligns label vectors using an [`AssignmentSolver`].
#[derive(Debug, Clone, Default)]
pub struct LabelAligner<S = KuhnMunkres> {
    solver: S,
}

impl LabelAligner<KuhnMunkres> {
    /// Create an aligner backed by the Hungarian algorithm.
    pub fn new() -> Self {
        Self {
            solver: KuhnMunkres,
        }
    }
}

impl<S: AssignmentSolver> LabelAligner<S> {
    /// Create an aligner with a custom assignment solver.
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }

    /// Find the relabeling of `candidate` that best matches `reference`.
    ///
    /// # Errors
    /// * [`ConsensusError::ClusterCountMismatch`] when the two vectors have a
    ///   different number of distinct labels.
    /// * [`ConsensusError::DimensionMismatch`] when their lengths differ.
    pub fn align(&self, reference: &[usize], candidate: &[usize]) -> Result<AlignmentMapping> {
        let cm = ContingencyMatrix::new(reference, candidate)?;
        let assignment = self.solver.solve(&cm.weights(), Objective::Maximize)?;
        if assignment.len() != cm.size() {
            return Err(ConsensusError::Capability(format!(
                "assignment solver returned {} pairs for {} clusters",
                assignment.len(),
                cm.size()
            )));
        }

        let pairs = assignment
            .iter()
            .zip(cm.row_labels())
            .map(|(&col, &desired)| {
                cm.col_labels()
                    .get(col)
                    .map(|&current| (desired, current))
                    .ok_or_else(|| {
                        ConsensusError::Capability(format!(
                            "assignment solver returned column {col} for {} clusters",
                            cm.size()
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        AlignmentMapping::from_pairs(pairs).map_err(|_| {
            ConsensusError::Capability("assignment solver returned a non-bijective pairing".into())
        })
    }

    /// Align `candidate` to `reference` and return the relabeled candidate.
    pub fn align_and_relabel(&self, reference: &[usize], candidate: &[usize]) -> Result<Vec<usize>> {
        let mapping = self.align(reference, candidate)?;
        Ok(relabel(candidate, &mapping))
    }
}

/// Apply a mapping to a label vector.
///
/// Every substitution reads from the original `labels`, so cyclic mappings
/// such as `0 -> 1, 1 -> 0` swap labels instead of collapsing them. Labels
/// not covered by the mapping are copied unchanged.
pub fn relabel(labels: &[usize], mapping: &AlignmentMapping) -> Vec<usize> {
    if mapping.is_identity() {
        return labels.to_vec();
    }

    let lookup: HashMap<usize, usize> = mapping
        .pairs()
        .iter()
        .filter(|p| p.desired != p.current)
        .map(|p| (p.current, p.desired))
        .collect();

    labels
        .iter()
        .map(|l| lookup.get(l).copied().unwrap_or(*l))
        .collect()
}

/// Align `candidate` to `reference` with the default Hungarian solver.
pub fn align(reference: &[usize], candidate: &[usize]) -> Result<AlignmentMapping> {
    LabelAligner::new().align(reference, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_alignment_is_identity() {
        let labels = [2, 0, 1, 1, 0, 2];
        let mapping = align(&labels, &labels).unwrap();

        assert!(mapping.is_identity());
        assert_eq!(relabel(&labels, &mapping), labels.to_vec());
    }

    #[test]
    fn swapped_labels_are_restored() {
        let reference = [0, 0, 1, 1];
        let candidate = [1, 1, 0, 0];
        let mapping = align(&reference, &candidate).unwrap();

        assert_eq!(mapping.desired_for(1), Some(0));
        assert_eq!(mapping.desired_for(0), Some(1));
        assert_eq!(relabel(&candidate, &mapping), vec![0, 0, 1, 1]);
    }

    #[test]
    fn three_cycle_is_applied_simultaneously() {
        let mapping = AlignmentMapping::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let labels = [0, 1, 2, 2, 1, 0];

        // 1 -> 0, 2 -> 1, 0 -> 2, each read from the original vector
        assert_eq!(relabel(&labels, &mapping), vec![2, 0, 1, 1, 0, 2]);
    }

    #[test]
    fn relabel_does_not_mutate_input() {
        let labels = vec![0, 1, 0, 1];
        let mapping = AlignmentMapping::from_pairs([(0, 1), (1, 0)]).unwrap();
        let relabeled = relabel(&labels, &mapping);

        assert_eq!(labels, vec![0, 1, 0, 1]);
        assert_eq!(relabeled, vec![1, 0, 1, 0]);
    }

    #[test]
    fn best_match_wins_with_noise() {
        let reference = [0, 0, 0, 1, 1, 1, 2, 2, 2];
        // Candidate uses a rotated numbering and misplaces one point.
        let candidate = [2, 2, 0, 0, 0, 0, 1, 1, 1];
        let aligned = LabelAligner::new()
            .align_and_relabel(&reference, &candidate)
            .unwrap();

        assert_eq!(aligned, vec![0, 0, 1, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn value_domain_labels_are_preserved() {
        let reference = [5, 5, 9, 9];
        let candidate = [3, 3, 1, 1];
        let mapping = align(&reference, &candidate).unwrap();

        assert_eq!(mapping.desired_for(3), Some(5));
        assert_eq!(mapping.desired_for(1), Some(9));
        assert_eq!(relabel(&candidate, &mapping), vec![5, 5, 9, 9]);
    }

    #[test]
    fn mismatched_cluster_counts_fail() {
        let err = align(&[0, 0, 0, 0], &[0, 0, 1, 1]).unwrap_err();
        assert_eq!(
            err,
            ConsensusError::ClusterCountMismatch {
                reference: 1,
                candidate: 2
            }
        );
    }

    #[test]
    fn non_bijective_mapping_is_rejected() {
        assert!(AlignmentMapping::from_pairs([(0, 1), (1, 1)]).is_err());
        assert!(AlignmentMapping::from_pairs([(0, 1), (0, 2)]).is_err());
    }

    struct BrokenSolver;

    impl AssignmentSolver for BrokenSolver {
        fn solve(&self, weights: &[Vec<i64>], _: Objective) -> Result<Vec<usize>> {
            Ok(vec![0; weights.len()])
        }
    }

    #[test]
    fn solver_output_is_validated() {
        let aligner = LabelAligner::with_solver(BrokenSolver);
        let err = aligner.align(&[0, 1], &[1, 0]).unwrap_err();
        assert!(matches!(err, ConsensusError::Capability(_)));
    }
}
