//! Label alignment across repeated clustering runs.
//!
//! Provides the contingency matrix between two partitions, the optimal
//! relabeling of one partition onto another, and the alignment of a whole
//! sequence of runs against its first run with a consensus labeling.
//!
//! # Example
//!
//! ```
//! use cluster_consensus::alignment::{align, align_sequence, relabel};
//!
//! // Same partition, different numbering
//! let reference = vec![0, 0, 1, 1];
//! let candidate = vec![1, 1, 0, 0];
//! let mapping = align(&reference, &candidate).unwrap();
//! assert_eq!(relabel(&candidate, &mapping), reference);
//!
//! let aligned = align_sequence(&[reference.clone(), candidate]).unwrap();
//! assert!(aligned.is_unanimous());
//! assert_eq!(aligned.consensus(), reference);
//! ```

pub mod aligner;
pub mod contingency;
pub mod sequence;
pub mod solver;

pub use aligner::{align, relabel, AlignmentMapping, LabelAligner, LabelPair};
pub use contingency::{cluster_count, ContingencyMatrix};
pub use sequence::{align_sequence, AlignedLabelMatrix, ConsensusSequencer};
pub use solver::{AssignmentSolver, KuhnMunkres, Objective};
