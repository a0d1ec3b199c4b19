//! Parameter grids and the configurations they enumerate.

use crate::error::{ConsensusError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Grid parameter read as the number of clusters by the bundled k-means.
pub const N_CLUSTERS: &str = "n_clusters";
/// Grid parameter holding the number of restarts per clustering call.
pub const N_INIT: &str = "n_init";
/// Grid parameter holding the number of leading dataset columns to cluster on.
pub const N_COMPONENTS: &str = "n_components";

/// A single hyperparameter value.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Value as a non-negative integer, if it is one.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ParamValue::Int(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    /// Value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ParamValue::Int(_) => 0,
            ParamValue::Float(_) => 1,
            ParamValue::Text(_) => 2,
        }
    }
}

// Floats compare with `total_cmp` so values can serve as map keys.
impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ParamValue::Int(a), ParamValue::Int(b)) => a.cmp(b),
            (ParamValue::Float(a), ParamValue::Float(b)) => a.total_cmp(b),
            (ParamValue::Text(a), ParamValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamValue {}

impl std::hash::Hash for ParamValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            ParamValue::Int(v) => v.hash(state),
            ParamValue::Float(v) => v.to_bits().hash(state),
            ParamValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            // Debug always prints a decimal point: `2.0`, not `2`.
            ParamValue::Float(v) => write!(f, "{v:?}"),
            ParamValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Identifies one grid point in every output mapping.
///
/// Holds the grid-declared parameters in declaration order. Defaults injected
/// by the evaluator are never part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigurationKey {
    entries: Vec<(String, ParamValue)>,
}

impl ConfigurationKey {
    /// Create a key from ordered `(name, value)` entries.
    pub fn new(entries: Vec<(String, ParamValue)>) -> Self {
        Self { entries }
    }

    /// Create a key from `(name, value)` pairs, e.g. for report lookups.
    ///
    /// ```
    /// use cluster_consensus::grid::ConfigurationKey;
    ///
    /// let key = ConfigurationKey::from_pairs([("n_clusters", 3), ("n_components", 2)]);
    /// assert_eq!(key.to_string(), "n_clusters=3, n_components=2");
    /// ```
    pub fn from_pairs<'a, V: Into<ParamValue>>(
        pairs: impl IntoIterator<Item = (&'a str, V)>,
    ) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(n, v)| (n.to_string(), v.into()))
                .collect(),
        )
    }

    /// Ordered entries.
    pub fn entries(&self) -> &[(String, ParamValue)] {
        &self.entries
    }

    /// Value of a named parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Values only, in declaration order.
    pub fn values(&self) -> Vec<&ParamValue> {
        self.entries.iter().map(|(_, v)| v).collect()
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Parameters handed to a clustering capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterParams {
    entries: Vec<(String, ParamValue)>,
}

impl ClusterParams {
    /// Create parameters from ordered `(name, value)` entries.
    pub fn new(entries: Vec<(String, ParamValue)>) -> Self {
        Self { entries }
    }

    /// Ordered entries.
    pub fn entries(&self) -> &[(String, ParamValue)] {
        &self.entries
    }

    /// Value of a named parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Named parameter as a non-negative integer.
    pub fn get_usize(&self, name: &str) -> Option<usize> {
        self.get(name).and_then(ParamValue::as_usize)
    }

    /// Named parameter as a float.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }
}

/// One point of a [`ParameterGrid`], ready to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Lookup key for the output mappings.
    pub key: ConfigurationKey,
    /// Parameters for the clustering call; excludes `n_components`.
    pub params: ClusterParams,
    /// Leading dataset columns to cluster on; `None` keeps all columns.
    pub components: Option<usize>,
}

/// Candidate values per hyperparameter, in declaration order.
///
/// # Example
///
/// ```
/// use cluster_consensus::grid::ParameterGrid;
///
/// let grid = ParameterGrid::new()
///     .add("n_clusters", [2, 3, 4])
///     .add("n_components", [2, 5]);
/// assert_eq!(grid.len(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterGrid {
    params: Vec<(String, Vec<ParamValue>)>,
}

impl ParameterGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter and its candidate values.
    pub fn add<V: Into<ParamValue>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.params
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Declared parameters.
    pub fn params(&self) -> &[(String, Vec<ParamValue>)] {
        &self.params
    }

    /// Check if a parameter is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|(n, _)| n == name)
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        if self.params.is_empty() {
            return 0;
        }
        self.params.iter().map(|(_, v)| v.len()).product()
    }

    /// Check if the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the grid for emptiness, duplicates and invalid reserved values.
    pub fn validate(&self) -> Result<()> {
        if self.params.is_empty() {
            return Err(ConsensusError::InvalidParameterGrid(
                "grid declares no parameters".to_string(),
            ));
        }
        for (i, (name, values)) in self.params.iter().enumerate() {
            if values.is_empty() {
                return Err(ConsensusError::InvalidParameterGrid(format!(
                    "parameter '{name}' has no candidate values"
                )));
            }
            if self.params[..i].iter().any(|(n, _)| n == name) {
                return Err(ConsensusError::InvalidParameterGrid(format!(
                    "parameter '{name}' is declared twice"
                )));
            }
            for (j, value) in values.iter().enumerate() {
                if values[..j].contains(value) {
                    return Err(ConsensusError::InvalidParameterGrid(format!(
                        "parameter '{name}' lists value {value} twice"
                    )));
                }
            }
            if name == N_COMPONENTS || name == N_INIT {
                if let Some(bad) = values.iter().find(|v| !matches!(v.as_usize(), Some(n) if n > 0))
                {
                    return Err(ConsensusError::InvalidParameterGrid(format!(
                        "reserved parameter '{name}' must be a positive integer, got {bad}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Enumerate the cartesian product of all parameter values.
    ///
    /// The first declared parameter varies slowest. `n_components`, when
    /// declared, is moved out of the clustering parameters into
    /// [`Configuration::components`] but stays in the key. `default_restarts`
    /// is added to the clustering parameters as `n_init` only when the grid
    /// does not declare it, and never to the key.
    pub fn configurations(&self, default_restarts: usize) -> Result<Vec<Configuration>> {
        self.validate()?;

        let mut points: Vec<Vec<(String, ParamValue)>> = vec![Vec::new()];
        for (name, values) in &self.params {
            points = points
                .into_iter()
                .flat_map(|prefix| {
                    values.iter().map(move |v| {
                        let mut point = prefix.clone();
                        point.push((name.clone(), v.clone()));
                        point
                    })
                })
                .collect();
        }

        let inject_restarts = !self.contains(N_INIT);
        Ok(points
            .into_iter()
            .map(|entries| {
                let components = entries
                    .iter()
                    .find(|(n, _)| n == N_COMPONENTS)
                    .and_then(|(_, v)| v.as_usize());
                let mut params: Vec<(String, ParamValue)> = entries
                    .iter()
                    .filter(|(n, _)| n != N_COMPONENTS)
                    .cloned()
                    .collect();
                if inject_restarts {
                    params.push((N_INIT.to_string(), ParamValue::from(default_restarts)));
                }
                Configuration {
                    key: ConfigurationKey::new(entries),
                    params: ClusterParams::new(params),
                    components,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartesian_product_in_declaration_order() {
        let grid = ParameterGrid::new()
            .add(N_CLUSTERS, [2, 3])
            .add("init", ["k-means++", "random"]);
        let configs = grid.configurations(10).unwrap();

        let keys: Vec<String> = configs.iter().map(|c| c.key.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "n_clusters=2, init=k-means++",
                "n_clusters=2, init=random",
                "n_clusters=3, init=k-means++",
                "n_clusters=3, init=random",
            ]
        );
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn restarts_default_is_injected_only_when_absent() {
        let grid = ParameterGrid::new().add(N_CLUSTERS, [2]);
        let config = &grid.configurations(7).unwrap()[0];
        assert_eq!(config.params.get_usize(N_INIT), Some(7));
        assert!(config.key.get(N_INIT).is_none());

        let grid = ParameterGrid::new().add(N_CLUSTERS, [2]).add(N_INIT, [3]);
        let config = &grid.configurations(7).unwrap()[0];
        assert_eq!(config.params.get_usize(N_INIT), Some(3));
        assert_eq!(config.key.get(N_INIT), Some(&ParamValue::Int(3)));
    }

    #[test]
    fn components_are_a_pass_through() {
        let grid = ParameterGrid::new()
            .add(N_COMPONENTS, [2])
            .add(N_CLUSTERS, [4]);
        let config = &grid.configurations(10).unwrap()[0];

        assert_eq!(config.components, Some(2));
        assert!(config.params.get(N_COMPONENTS).is_none());
        assert_eq!(config.key.to_string(), "n_components=2, n_clusters=4");
    }

    #[test]
    fn components_absent_from_key_when_not_declared() {
        let grid = ParameterGrid::new().add(N_CLUSTERS, [4]);
        let config = &grid.configurations(10).unwrap()[0];

        assert_eq!(config.components, None);
        assert_eq!(config.key.entries().len(), 1);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        let empty = ParameterGrid::new();
        assert!(matches!(
            empty.validate(),
            Err(ConsensusError::InvalidParameterGrid(_))
        ));

        let no_values = ParameterGrid::new().add(N_CLUSTERS, Vec::<i64>::new());
        assert!(no_values.validate().is_err());

        let duplicate = ParameterGrid::new().add(N_CLUSTERS, [2]).add(N_CLUSTERS, [3]);
        assert!(duplicate.validate().is_err());

        let bad_components = ParameterGrid::new().add(N_COMPONENTS, [0]);
        assert!(bad_components.validate().is_err());

        let text_restarts = ParameterGrid::new().add(N_INIT, ["auto"]);
        assert!(text_restarts.validate().is_err());
    }

    #[test]
    fn repeated_values_are_rejected() {
        let repeated = ParameterGrid::new().add(N_CLUSTERS, [2, 2]);
        assert_eq!(repeated.len(), 2);
        assert!(matches!(
            repeated.configurations(10),
            Err(ConsensusError::InvalidParameterGrid(_))
        ));

        let repeated_float = ParameterGrid::new()
            .add(N_CLUSTERS, [2])
            .add("tol", [1e-4, 0.5, 1e-4]);
        assert!(repeated_float.validate().is_err());

        // Same number, different kinds: distinct keys.
        let mixed = ParameterGrid::new().add("alpha", [ParamValue::Int(2), ParamValue::Float(2.0)]);
        assert!(mixed.validate().is_ok());
        assert_eq!(mixed.configurations(10).unwrap().len(), 2);
    }

    #[test]
    fn float_values_display_with_a_decimal_point() {
        assert_eq!(ParamValue::Float(2.0).to_string(), "2.0");
        assert_eq!(ParamValue::Int(2).to_string(), "2");
        assert_eq!(ParamValue::Float(0.25).to_string(), "0.25");

        let int_key = ConfigurationKey::from_pairs([("alpha", ParamValue::Int(2))]);
        let float_key = ConfigurationKey::from_pairs([("alpha", ParamValue::Float(2.0))]);
        assert_ne!(int_key.to_string(), float_key.to_string());
    }

    #[test]
    fn param_values_order_totally() {
        let mut values = vec![
            ParamValue::from("b"),
            ParamValue::from(2.5),
            ParamValue::from(3),
            ParamValue::from(f64::NAN),
            ParamValue::from(-1.0),
        ];
        values.sort();
        assert_eq!(values[0], ParamValue::Int(3));
        assert_eq!(values[1], ParamValue::Float(-1.0));
        assert_eq!(values[4], ParamValue::Text("b".to_string()));
        assert_eq!(ParamValue::Float(f64::NAN), ParamValue::Float(f64::NAN));
    }
}
