//! Prepared feature matrix and label vector
//!
//! Feature preparation (dropping columns, one-hot encoding) happens before
//! data reaches this crate; a [`Dataset`] is the already-numeric result.

use crate::{Error, Result};

/// Row-major feature matrix with one integer class label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<i64>,
    feature_names: Vec<String>,
}

impl Dataset {
    /// Create a dataset, checking the shape.
    ///
    /// Feature names default to `x0, x1, ...`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if there are no rows, rows differ in
    /// width, or the label count does not match the row count.
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<i64>) -> Result<Self> {
        let width = features.first().map_or(0, Vec::len);
        let names = (0..width).map(|i| format!("x{i}")).collect();
        Self::with_feature_names(features, labels, names)
    }

    /// Create a dataset with explicit column names.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::new`], plus a name count mismatch.
    pub fn with_feature_names(
        features: Vec<Vec<f64>>,
        labels: Vec<i64>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::InvalidData("dataset has no rows".to_string()));
        }
        if features.len() != labels.len() {
            return Err(Error::InvalidData(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let width = feature_names.len();
        if let Some(row) = features.iter().position(|r| r.len() != width) {
            return Err(Error::InvalidData(format!(
                "row {row} has {} features, expected {width}",
                features[row].len()
            )));
        }

        Ok(Self {
            features,
            labels,
            feature_names,
        })
    }

    /// Feature rows.
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Class labels.
    #[must_use]
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Sorted distinct labels.
    #[must_use]
    pub fn classes(&self) -> Vec<i64> {
        let mut classes = self.labels.clone();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Row subset, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for an empty selection or an index past the end.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::InvalidData("empty row selection".to_string()));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_samples()) {
            return Err(Error::InvalidData(format!(
                "row index {bad} out of bounds for {} samples",
                self.n_samples()
            )));
        }

        Ok(Self {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
        })
    }
}
