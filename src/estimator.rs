//! Estimator capability
//!
//! Learning algorithms live outside this crate. Searchers and validators only
//! see this trait, never a concrete classifier family.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::params::ParamSet;
use crate::Result;

/// A configurable, trainable classifier.
///
/// Implementations must be serializable: a fitted estimator is persisted as
/// a model artifact and deserialized again on replay.
pub trait Estimator: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// Train on the given rows.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying algorithm, reported as
    /// [`crate::Error::Estimator`].
    fn fit(&mut self, data: &Dataset) -> Result<()>;

    /// Predict one label per feature row.
    ///
    /// # Errors
    ///
    /// Typically fails when called before [`Estimator::fit`].
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i64>>;

    /// Full current configuration, including defaults.
    fn configuration(&self) -> ParamSet;

    /// Unfitted copy with `params` applied on top of the current configuration.
    ///
    /// # Errors
    ///
    /// Unknown parameter names or values of the wrong type.
    fn configure(&self, params: &ParamSet) -> Result<Self>;
}
