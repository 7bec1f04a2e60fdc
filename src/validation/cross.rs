//! k-fold validation of the best configuration

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::CrossValidationResult;
use crate::dataset::Dataset;
use crate::estimator::Estimator;
use crate::metrics::Scoring;
use crate::search::{score_folds, SearchOutcome};
use crate::split::FoldStrategy;
use crate::timing::Timing;
use crate::Result;

/// Settings for [`CrossValidator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidatorConfig {
    /// Fold strategy
    pub cv: FoldStrategy,
    /// Scoring function
    pub scoring: Scoring,
    /// Seed for fold shuffling
    pub seed: u64,
}

/// Re-scores the best configuration over k folds.
#[derive(Debug, Clone)]
pub struct CrossValidator {
    data: Dataset,
    pub(super) config: CrossValidatorConfig,
    timing: Option<Timing>,
}

impl CrossValidator {
    /// Create a cross-validator over `data`.
    #[must_use]
    pub const fn new(data: Dataset, config: CrossValidatorConfig) -> Self {
        Self {
            data,
            config,
            timing: None,
        }
    }

    /// Fit a fresh copy of the best configuration per fold and summarise the scores.
    ///
    /// The outcome's refit best estimator is carried unchanged as the artifact.
    ///
    /// # Errors
    ///
    /// Fold and estimator failures propagate unmodified.
    pub fn validate<E: Estimator>(&mut self, outcome: &SearchOutcome<E>) -> Result<CrossValidationResult<E>> {
        let started_at = Utc::now();
        tracing::info!(folds = self.config.cv.n_splits(), "validating best model");

        let prototype = outcome.best_estimator.configure(&outcome.best_params)?;
        let folds = self.config.cv.split(&self.data, self.config.seed)?;
        let scores = score_folds(&prototype, &self.data, &folds, self.config.scoring)?;
        let result = CrossValidationResult::from_scores(scores, outcome.best_estimator.clone())?;

        let timing = Timing::new(started_at, Utc::now());
        self.timing = Some(timing);
        tracing::info!(
            mean = result.summary().mean(),
            elapsed = %timing.formatted(),
            "cross-validation finished"
        );
        Ok(result)
    }

    /// Timestamps of the last completed validation.
    #[must_use]
    pub const fn timing(&self) -> Option<Timing> {
        self.timing
    }
}
