//! Optimal assignment between rows and columns of a square weight matrix.

use crate::error::{ConsensusError, Result};
use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

/// Optimization direction for an assignment problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Maximize the total matched weight.
    #[default]
    Maximize,
    /// Minimize the total matched weight.
    Minimize,
}

/// Solves the linear assignment problem.
///
/// Implementations return, for every row `r`, the column assigned to it,
/// such that the assignment is a bijection and its total weight is optimal
/// for the requested [`Objective`].
pub trait AssignmentSolver: Send + Sync {
    /// Solve the assignment problem on a square weight matrix.
    fn solve(&self, weights: &[Vec<i64>], objective: Objective) -> Result<Vec<usize>>;
}

/// Hungarian (Kuhn-Munkres) solver from the `pathfinding` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct KuhnMunkres;

impl AssignmentSolver for KuhnMunkres {
    fn solve(&self, weights: &[Vec<i64>], objective: Objective) -> Result<Vec<usize>> {
        let n = weights.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        if let Some(row) = weights.iter().find(|row| row.len() != n) {
            return Err(ConsensusError::DimensionMismatch {
                expected: n,
                got: row.len(),
            });
        }

        let mut matrix = Matrix::new(n, n, 0i64);
        for (r, row) in weights.iter().enumerate() {
            for (c, &w) in row.iter().enumerate() {
                matrix[(r, c)] = match objective {
                    Objective::Maximize => w,
                    Objective::Minimize => -w,
                };
            }
        }

        let (_, assignment) = kuhn_munkres(&matrix);
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(weights: &[Vec<i64>], assignment: &[usize]) -> i64 {
        assignment
            .iter()
            .enumerate()
            .map(|(r, &c)| weights[r][c])
            .sum()
    }

    #[test]
    fn maximizes_total_weight() {
        let weights = vec![vec![0, 5, 0], vec![4, 0, 1], vec![0, 2, 6]];
        let assignment = KuhnMunkres.solve(&weights, Objective::Maximize).unwrap();

        assert_eq!(assignment, vec![1, 0, 2]);
        assert_eq!(total(&weights, &assignment), 15);
    }

    #[test]
    fn minimizes_total_weight() {
        let weights = vec![vec![4, 1, 3], vec![2, 0, 5], vec![3, 2, 2]];
        let assignment = KuhnMunkres.solve(&weights, Objective::Minimize).unwrap();

        assert_eq!(total(&weights, &assignment), 5);
    }

    #[test]
    fn empty_matrix_yields_empty_assignment() {
        let assignment = KuhnMunkres.solve(&[], Objective::Maximize).unwrap();
        assert!(assignment.is_empty());
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let weights = vec![vec![1, 2], vec![3]];
        let err = KuhnMunkres.solve(&weights, Objective::Maximize).unwrap_err();
        assert_eq!(
            err,
            ConsensusError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
    }
}
