//! Single train/test split validation

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::BasicValidationResult;
use crate::dataset::Dataset;
use crate::estimator::Estimator;
use crate::metrics::{ConfusionMatrix, Scoring};
use crate::search::SearchOutcome;
use crate::split::train_test_split;
use crate::timing::Timing;
use crate::Result;

/// Settings for [`BasicValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicValidatorConfig {
    /// Held-out fraction, in `(0, 1)`
    pub test_size: f64,
    /// Scoring function
    pub scoring: Scoring,
    /// Seed for the split shuffle
    pub seed: u64,
}

impl Default for BasicValidatorConfig {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            scoring: Scoring::Accuracy,
            seed: 0,
        }
    }
}

impl BasicValidatorConfig {
    /// Set the held-out fraction.
    #[must_use]
    pub const fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }
}

/// Fits the best configuration on a training split and scores the rest.
#[derive(Debug, Clone)]
pub struct BasicValidator {
    data: Dataset,
    pub(super) config: BasicValidatorConfig,
    timing: Option<Timing>,
}

impl BasicValidator {
    /// Create a hold-out validator over `data`.
    #[must_use]
    pub const fn new(data: Dataset, config: BasicValidatorConfig) -> Self {
        Self {
            data,
            config,
            timing: None,
        }
    }

    /// Split once, fit, predict the held-out rows and build a confusion matrix.
    ///
    /// The artifact is the estimator fitted on the training split.
    ///
    /// # Errors
    ///
    /// A bad `test_size` or too few rows fail with [`crate::Error::InvalidData`];
    /// estimator failures propagate unmodified.
    pub fn validate<E: Estimator>(&mut self, outcome: &SearchOutcome<E>) -> Result<BasicValidationResult<E>> {
        let started_at = Utc::now();
        tracing::info!(test_size = self.config.test_size, "validating best model on a hold-out split");

        let split = train_test_split(self.data.n_samples(), self.config.test_size, self.config.seed)?;
        let train = self.data.select(&split.train_indices)?;
        let test = self.data.select(&split.test_indices)?;

        let mut estimator = outcome.best_estimator.configure(&outcome.best_params)?;
        estimator.fit(&train)?;
        let predictions = estimator.predict(test.features())?;

        let score = self.config.scoring.score(test.labels(), &predictions)?;
        let confusion_matrix = ConfusionMatrix::from_predictions(test.labels(), &predictions)?;

        let timing = Timing::new(started_at, Utc::now());
        self.timing = Some(timing);
        tracing::info!(score, elapsed = %timing.formatted(), "hold-out validation finished");

        Ok(BasicValidationResult::new(score, confusion_matrix, estimator))
    }

    /// Timestamps of the last completed validation.
    #[must_use]
    pub const fn timing(&self) -> Option<Timing> {
        self.timing
    }
}
