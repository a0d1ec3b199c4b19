//! Core data structures.

mod dataset;

pub use dataset::Dataset;
