//! Hyperparameter values, configurations and search spaces
//!
//! A [`ParamSpace`] declares, per parameter name, either a discrete list of
//! values or a distribution to sample from. Grid search enumerates the lists;
//! random search samples any of them.
//!
//! ```rust
//! use searchlog::params::{ParamDistribution, ParamSpace};
//!
//! let space = ParamSpace::new()
//!     .add("criterion", ParamDistribution::values(["gini", "entropy"]))
//!     .add("max_depth", ParamDistribution::values([3_i64, 5, 7]));
//!
//! assert_eq!(space.grid_size(), Some(6));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single hyperparameter value.
///
/// Serialized untagged so a configuration reads as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String / categorical value
    Str(String),
    /// Explicit "unset" (e.g. `max_features = None`)
    None,
}

impl ParamValue {
    /// Numeric view of the value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer view of the value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean view of the value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of the value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "'{v}'"),
            Self::None => write!(f, "None"),
        }
    }
}

/// One candidate configuration: parameter name to value, in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParamSet {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Number of parameters set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of `self`.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { values }
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.iter().map(|(k, v)| format!("'{k}': {v}")).collect();
        write!(f, "{{{}}}", params.join(", "))
    }
}

/// How a parameter's candidate values are declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamDistribution {
    /// Discrete list of values
    Values(Vec<ParamValue>),
    /// Uniform integer in `[low, high)`
    IntRange {
        /// Inclusive lower bound
        low: i64,
        /// Exclusive upper bound
        high: i64,
    },
    /// Uniform float in `[loc, loc + scale]`
    Uniform {
        /// Lower bound
        loc: f64,
        /// Width of the interval
        scale: f64,
    },
}

impl ParamDistribution {
    /// Discrete list from anything convertible to [`ParamValue`].
    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    /// Uniform integer in `[low, high)`.
    #[must_use]
    pub const fn int_range(low: i64, high: i64) -> Self {
        Self::IntRange { low, high }
    }

    /// Uniform float in `[loc, loc + scale]`.
    #[must_use]
    pub const fn uniform(loc: f64, scale: f64) -> Self {
        Self::Uniform { loc, scale }
    }

    /// Number of enumerable values; `None` for sampled distributions.
    #[must_use]
    pub fn discrete_len(&self) -> Option<usize> {
        match self {
            Self::Values(values) => Some(values.len()),
            _ => None,
        }
    }

    /// Draw one value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParamSpace`] for an empty list, an empty
    /// integer range or a non-finite uniform distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ParamValue> {
        if let Some(p) = self.problem() {
            return Err(Error::InvalidParamSpace(format!("cannot sample from {p}")));
        }
        Ok(self.draw(rng))
    }

    // caller has validated the distribution
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ParamValue {
        match self {
            Self::Values(values) => values[rng.gen_range(0..values.len())].clone(),
            Self::IntRange { low, high } => ParamValue::Int(rng.gen_range(*low..*high)),
            Self::Uniform { loc, scale } => ParamValue::Float(loc + scale * rng.gen::<f64>()),
        }
    }

    fn problem(&self) -> Option<String> {
        match self {
            Self::Values(values) if values.is_empty() => Some("an empty value list".to_string()),
            Self::IntRange { low, high } if low >= high => {
                Some(format!("an empty integer range [{low}, {high})"))
            }
            Self::Uniform { loc, scale } if !loc.is_finite() || !scale.is_finite() || *scale < 0.0 => {
                Some(format!("an invalid uniform distribution (loc={loc}, scale={scale})"))
            }
            _ => None,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        self.problem().map_or(Ok(()), |p| {
            Err(Error::InvalidParamSpace(format!("parameter '{name}' has {p}")))
        })
    }
}

/// Declared search space: parameter name to distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSpace {
    params: BTreeMap<String, ParamDistribution>,
}

impl ParamSpace {
    /// Create an empty search space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a parameter.
    #[must_use]
    pub fn add(mut self, name: impl Into<String>, distribution: ParamDistribution) -> Self {
        self.params.insert(name.into(), distribution);
        self
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True if no parameter is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamDistribution)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check every distribution is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParamSpace`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        self.params
            .iter()
            .try_for_each(|(name, dist)| dist.validate(name))
    }

    /// Product of the value-list lengths, or `None` if any parameter is a
    /// sampled distribution or the product overflows `usize`.
    #[must_use]
    pub fn grid_size(&self) -> Option<usize> {
        self.params
            .values()
            .map(ParamDistribution::discrete_len)
            .try_fold(1_usize, |acc, len| acc.checked_mul(len?))
    }

    /// Cartesian product of all value lists.
    ///
    /// Parameters are combined in name order with the last one varying
    /// fastest, so the enumeration is deterministic.
    ///
    /// # Errors
    ///
    /// Fails if the space is invalid or any parameter is not a discrete list.
    pub fn grid(&self) -> Result<Vec<ParamSet>> {
        self.validate()?;

        let mut configs = vec![ParamSet::new()];
        for (name, dist) in &self.params {
            let ParamDistribution::Values(values) = dist else {
                return Err(Error::InvalidParamSpace(format!(
                    "grid search needs a discrete value list for '{name}'"
                )));
            };

            let mut next = Vec::with_capacity(configs.len() * values.len());
            for config in &configs {
                for value in values {
                    let mut candidate = config.clone();
                    candidate.insert(name.clone(), value.clone());
                    next.push(candidate);
                }
            }
            configs = next;
        }

        Ok(configs)
    }

    /// Sample one configuration, each parameter drawn independently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParamSpace`] naming the first parameter that
    /// cannot be sampled; nothing is drawn in that case.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ParamSet> {
        self.validate()?;
        let mut config = ParamSet::new();
        for (name, dist) in &self.params {
            config.insert(name.clone(), dist.draw(rng));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grid_cartesian_product() {
        let space = ParamSpace::new()
            .add("a", ParamDistribution::values([1_i64, 2]))
            .add("b", ParamDistribution::values(["x", "y", "z"]));

        let grid = space.grid().unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(space.grid_size(), Some(6));

        // last parameter varies fastest
        assert_eq!(grid[0].get("a"), Some(&ParamValue::Int(1)));
        assert_eq!(grid[0].get("b"), Some(&ParamValue::from("x")));
        assert_eq!(grid[1].get("b"), Some(&ParamValue::from("y")));
        assert_eq!(grid[3].get("a"), Some(&ParamValue::Int(2)));
    }

    #[test]
    fn test_grid_rejects_distributions() {
        let space = ParamSpace::new().add("depth", ParamDistribution::int_range(1, 10));
        assert!(space.grid_size().is_none());
        assert!(matches!(space.grid(), Err(Error::InvalidParamSpace(_))));
    }

    #[test]
    fn test_empty_space_has_single_candidate() {
        let grid = ParamSpace::new().grid().unwrap();
        assert_eq!(grid.len(), 1);
        assert!(grid[0].is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_list_and_range() {
        let empty = ParamSpace::new().add("k", ParamDistribution::Values(vec![]));
        assert!(empty.validate().is_err());

        let inverted = ParamSpace::new().add("k", ParamDistribution::int_range(5, 5));
        assert!(inverted.validate().is_err());

        let negative = ParamSpace::new().add("f", ParamDistribution::uniform(0.1, -0.4));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_sample_stays_in_bounds() {
        let space = ParamSpace::new()
            .add("n", ParamDistribution::int_range(2, 20))
            .add("w", ParamDistribution::uniform(0.1, 0.4));
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..200 {
            let config = space.sample(&mut rng).unwrap();
            let n = config.get("n").and_then(ParamValue::as_i64).unwrap();
            let w = config.get("w").and_then(ParamValue::as_f64).unwrap();
            assert!((2..20).contains(&n));
            assert!((0.1..=0.5).contains(&w));
        }
    }

    #[test]
    fn test_sample_rejects_unusable_distributions() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let empty = ParamSpace::new().add("k", ParamDistribution::Values(vec![]));
        match empty.sample(&mut rng) {
            Err(Error::InvalidParamSpace(msg)) => assert!(msg.contains("'k'")),
            other => panic!("expected InvalidParamSpace, got {other:?}"),
        }

        let inverted = ParamDistribution::int_range(4, 4);
        assert!(matches!(inverted.sample(&mut rng), Err(Error::InvalidParamSpace(_))));
        assert!(ParamDistribution::Values(vec![]).sample(&mut rng).is_err());

        let ok = ParamDistribution::values([7_i64]).sample(&mut rng).unwrap();
        assert_eq!(ok, ParamValue::Int(7));
    }

    #[test]
    fn test_grid_size_overflow_is_none() {
        let wide = ParamDistribution::values(0..1 << 13);
        let space = ParamSpace::new()
            .add("a", wide.clone())
            .add("b", wide.clone())
            .add("c", wide.clone())
            .add("d", wide.clone())
            .add("e", wide);
        assert_eq!(space.grid_size(), None);

        let small = ParamSpace::new().add("a", ParamDistribution::values([1_i64, 2, 3]));
        assert_eq!(small.grid_size(), Some(3));
    }

    #[test]
    fn test_param_set_json_is_flat() {
        let params = ParamSet::new()
            .with("criterion", "gini")
            .with("max_depth", 4_i64)
            .with("max_features", Option::<&str>::None)
            .with("min_weight_fraction_leaf", 0.25);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "criterion": "gini",
                "max_depth": 4,
                "max_features": null,
                "min_weight_fraction_leaf": 0.25
            })
        );

        let back: ParamSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_param_set_display() {
        let params = ParamSet::new().with("k", 3_i64).with("weights", "distance");
        assert_eq!(params.to_string(), "{'k': 3, 'weights': 'distance'}");
    }
}
