//! Hyperparameter sweeps over repeated clustering runs.
//!
//! A [`ParameterGrid`] enumerates configurations; a [`GridEvaluator`] runs
//! each configuration several times, aligns the runs and aggregates their
//! metrics into a [`GridReport`] keyed by [`ConfigurationKey`].

pub mod evaluator;
pub mod params;
pub mod report;

pub use evaluator::{evaluate_grid, EvaluatorConfig, FailurePolicy, GridEvaluator};
pub use params::{
    ClusterParams, Configuration, ConfigurationKey, ParamValue, ParameterGrid, N_CLUSTERS,
    N_COMPONENTS, N_INIT,
};
pub use report::{ConfigurationMetrics, GridReport};
