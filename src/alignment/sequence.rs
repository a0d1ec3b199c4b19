//! Alignment of repeated runs against the first run, and consensus labeling.

use super::aligner::{relabel, LabelAligner};
use super::solver::{AssignmentSolver, KuhnMunkres};
use crate::error::{ConsensusError, Result};
use std::collections::BTreeMap;

/// Label vectors of repeated runs, all numbered like the first run.
///
/// Row 0 is the reference run, untouched. Every other row has been relabeled
/// to agree with it as closely as possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedLabelMatrix {
    rows: Vec<Vec<usize>>,
}

impl AlignedLabelMatrix {
    /// Aligned label rows, one per run.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Number of runs.
    pub fn n_runs(&self) -> usize {
        self.rows.len()
    }

    /// Number of data points per run.
    pub fn n_points(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// The reference run.
    pub fn reference(&self) -> &[usize] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if every run produced the same aligned labels.
    pub fn is_unanimous(&self) -> bool {
        self.rows.windows(2).all(|w| w[0] == w[1])
    }

    /// Consensus label vector.
    ///
    /// The common row when all runs agree; otherwise the per-point plurality
    /// vote, with ties going to the smallest label.
    pub fn consensus(&self) -> Vec<usize> {
        if self.is_unanimous() {
            return self.reference().to_vec();
        }
        (0..self.n_points()).map(|i| self.vote(i).0).collect()
    }

    /// Mean fraction of runs agreeing with the consensus label of each point.
    ///
    /// 1.0 when all runs are unanimous.
    pub fn agreement(&self) -> f64 {
        let n = self.n_points();
        if n == 0 || self.is_unanimous() {
            return 1.0;
        }
        let runs = self.n_runs() as f64;
        (0..n).map(|i| self.vote(i).1 as f64 / runs).sum::<f64>() / n as f64
    }

    /// Winning label and its count at point `i`.
    fn vote(&self, i: usize) -> (usize, usize) {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row[i]).or_insert(0) += 1;
        }
        // Ascending iteration plus strict comparison keeps the smallest label on ties.
        counts
            .into_iter()
            .fold((0, 0), |best, (label, count)| {
                if count > best.1 {
                    (label, count)
                } else {
                    best
                }
            })
    }
}

/// Aligns repeated clustering runs against the first run.
#[derive(Debug, Clone, Default)]
pub struct ConsensusSequencer<S = KuhnMunkres> {
    aligner: LabelAligner<S>,
}

impl ConsensusSequencer<KuhnMunkres> {
    /// Create a sequencer backed by the Hungarian algorithm.
    pub fn new() -> Self {
        Self {
            aligner: LabelAligner::new(),
        }
    }
}

impl<S: AssignmentSolver> ConsensusSequencer<S> {
    /// Create a sequencer from an existing aligner.
    pub fn with_aligner(aligner: LabelAligner<S>) -> Self {
        Self { aligner }
    }

    /// Align every run to `runs[0]`.
    ///
    /// Fails as a whole if any run cannot be aligned; no partial matrix is
    /// returned.
    pub fn align_sequence(&self, runs: &[Vec<usize>]) -> Result<AlignedLabelMatrix> {
        let reference = runs.first().ok_or(ConsensusError::EmptyData)?;

        let mut rows = Vec::with_capacity(runs.len());
        rows.push(reference.to_vec());
        for run in &runs[1..] {
            let mapping = self.aligner.align(reference, run)?;
            rows.push(relabel(run, &mapping));
        }

        Ok(AlignedLabelMatrix { rows })
    }
}

/// Align runs with the default Hungarian solver.
pub fn align_sequence(runs: &[Vec<usize>]) -> Result<AlignedLabelMatrix> {
    ConsensusSequencer::new().align_sequence(runs)
}
