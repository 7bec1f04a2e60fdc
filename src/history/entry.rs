//! History Entry - one persisted experiment outcome

use serde::{Deserialize, Serialize};

use crate::estimator::Estimator;
use crate::metrics::{ConfusionMatrix, ScoreSummary};
use crate::params::ParamSet;
use crate::validation::{
    BasicValidationResult, CrossValidationResult, ValidationResult,
};
use crate::Result;

/// Flat record written for a cross-validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationEntry {
    mean: f64,
    standard_deviation: f64,
    median: f64,
    variance: f64,
    standard_error: f64,
    min_max_score: (f64, f64),
    estimator_params: ParamSet,
    search_time: String,
    validation_time: String,
}

impl CrossValidationEntry {
    /// Mean fold score.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Stored statistics.
    #[must_use]
    pub const fn summary(&self) -> ScoreSummary {
        ScoreSummary::from_stored(
            self.mean,
            self.standard_deviation,
            self.median,
            self.variance,
            self.standard_error,
            self.min_max_score,
        )
    }
}

/// Flat record written for a hold-out validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicValidationEntry {
    score: f64,
    estimator_params: ParamSet,
    confusion_matrix: Vec<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class_labels: Option<Vec<i64>>,
    search_time: String,
    validation_time: String,
}

impl BasicValidationEntry {
    /// Hold-out score.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Stored confusion matrix; labels default to `0..n` for records without them.
    ///
    /// # Errors
    ///
    /// Fails if the stored matrix is not square or the labels do not fit it.
    pub fn confusion_matrix(&self) -> Result<ConfusionMatrix> {
        let matrix = ConfusionMatrix::from_counts(self.confusion_matrix.clone())?;
        match &self.class_labels {
            Some(labels) => matrix.with_labels(labels.clone()),
            None => Ok(matrix),
        }
    }
}

/// One record of the history log.
///
/// The variant is recognised from the record's fields, so the log stays a
/// plain array of flat JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    /// Cross-validation record
    Cross(CrossValidationEntry),
    /// Hold-out validation record
    Basic(BasicValidationEntry),
}

impl HistoryEntry {
    /// Capture a result's scalar fields and the estimator configuration.
    #[must_use]
    pub fn from_result<E: Estimator>(
        result: &ValidationResult<E>,
        search_time: &str,
        validation_time: &str,
    ) -> Self {
        match result {
            ValidationResult::Cross(r) => {
                let s = r.summary();
                Self::Cross(CrossValidationEntry {
                    mean: s.mean(),
                    standard_deviation: s.standard_deviation(),
                    median: s.median(),
                    variance: s.variance(),
                    standard_error: s.standard_error(),
                    min_max_score: s.min_max_score(),
                    estimator_params: r.estimator().configuration(),
                    search_time: search_time.to_string(),
                    validation_time: validation_time.to_string(),
                })
            }
            ValidationResult::Basic(r) => {
                let cm = r.confusion_matrix();
                Self::Basic(BasicValidationEntry {
                    score: r.score(),
                    estimator_params: r.estimator().configuration(),
                    confusion_matrix: cm.counts().to_vec(),
                    class_labels: Some(cm.labels().to_vec()),
                    search_time: search_time.to_string(),
                    validation_time: validation_time.to_string(),
                })
            }
        }
    }

    /// Combine the stored metrics with a loaded estimator.
    ///
    /// # Errors
    ///
    /// Fails if a stored confusion matrix is malformed.
    pub fn to_result<E>(&self, estimator: E) -> Result<ValidationResult<E>> {
        Ok(match self {
            Self::Cross(entry) => {
                ValidationResult::Cross(CrossValidationResult::from_summary(entry.summary(), estimator))
            }
            Self::Basic(entry) => ValidationResult::Basic(BasicValidationResult::new(
                entry.score,
                entry.confusion_matrix()?,
                estimator,
            )),
        })
    }

    /// Configuration of the estimator that produced this record.
    #[must_use]
    pub const fn estimator_params(&self) -> &ParamSet {
        match self {
            Self::Cross(entry) => &entry.estimator_params,
            Self::Basic(entry) => &entry.estimator_params,
        }
    }

    /// Formatted search duration.
    #[must_use]
    pub fn search_time(&self) -> &str {
        match self {
            Self::Cross(entry) => &entry.search_time,
            Self::Basic(entry) => &entry.search_time,
        }
    }

    /// Formatted validation duration.
    #[must_use]
    pub fn validation_time(&self) -> &str {
        match self {
            Self::Cross(entry) => &entry.validation_time,
            Self::Basic(entry) => &entry.validation_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_record_schema() {
        let json = serde_json::json!({
            "mean": 0.8,
            "standard_deviation": 0.05,
            "median": 0.81,
            "variance": 0.0025,
            "standard_error": 0.02,
            "min_max_score": [0.7, 0.9],
            "estimator_params": {"criterion": "gini", "max_depth": 4},
            "search_time": "00:01:10",
            "validation_time": "00:00:02"
        });

        let entry: HistoryEntry = serde_json::from_value(json.clone()).unwrap();
        assert!(matches!(entry, HistoryEntry::Cross(_)));
        assert_eq!(entry.search_time(), "00:01:10");
        assert_eq!(entry.estimator_params().len(), 2);
        assert_eq!(serde_json::to_value(&entry).unwrap(), json);
    }

    #[test]
    fn test_basic_record_without_labels() {
        let json = serde_json::json!({
            "score": 0.78,
            "estimator_params": {"n_neighbors": 5},
            "confusion_matrix": [[100, 10], [20, 50]],
            "search_time": "00:00:30",
            "validation_time": "00:00:01"
        });

        let entry: HistoryEntry = serde_json::from_value(json).unwrap();
        let HistoryEntry::Basic(basic) = &entry else {
            panic!("expected a basic record");
        };
        let cm = basic.confusion_matrix().unwrap();
        assert_eq!(cm.labels(), [0, 1]);
        assert_eq!(cm.get(1, 0), 20);
        assert!((basic.score() - 0.78).abs() < f64::EPSILON);
    }
}
