//! Validation of the best search candidate
//!
//! A [`Validator`] turns a [`SearchOutcome`] into a [`ValidationResult`]:
//!
//! - [`CrossValidator`] re-scores the best configuration over k folds and
//!   summarises the fold scores
//! - [`BasicValidator`] fits once on a training split and scores a held-out split
//!
//! Results are immutable once built. They are either persisted by the
//! history store or discarded.

mod basic;
mod cross;

pub use basic::{BasicValidator, BasicValidatorConfig};
pub use cross::{CrossValidator, CrossValidatorConfig};

use std::fmt;

use crate::estimator::Estimator;
use crate::metrics::{ConfusionMatrix, ScoreSummary};
use crate::search::SearchOutcome;
use crate::timing::Timing;
use crate::Result;

const RULE_WIDTH: usize = 50;

/// Outcome of k-fold validation.
#[derive(Debug, Clone)]
pub struct CrossValidationResult<E> {
    summary: ScoreSummary,
    fold_scores: Vec<f64>,
    estimator: E,
}

impl<E> CrossValidationResult<E> {
    /// Build from raw fold scores; every statistic is derived from them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidData`] for an empty score list.
    pub fn from_scores(fold_scores: Vec<f64>, estimator: E) -> Result<Self> {
        let summary = ScoreSummary::from_scores(&fold_scores)?;
        Ok(Self {
            summary,
            fold_scores,
            estimator,
        })
    }

    /// Rebuild from a persisted summary; the fold scores are not stored.
    pub(crate) const fn from_summary(summary: ScoreSummary, estimator: E) -> Self {
        Self {
            summary,
            fold_scores: Vec::new(),
            estimator,
        }
    }

    /// Derived statistics.
    #[must_use]
    pub const fn summary(&self) -> &ScoreSummary {
        &self.summary
    }

    /// Per-fold scores; empty when replayed from history.
    #[must_use]
    pub fn fold_scores(&self) -> &[f64] {
        &self.fold_scores
    }

    /// The validated estimator.
    #[must_use]
    pub const fn estimator(&self) -> &E {
        &self.estimator
    }
}

/// Outcome of a single train/test split.
#[derive(Debug, Clone)]
pub struct BasicValidationResult<E> {
    score: f64,
    confusion_matrix: ConfusionMatrix,
    estimator: E,
}

impl<E> BasicValidationResult<E> {
    /// Bundle a hold-out score with its confusion matrix.
    #[must_use]
    pub const fn new(score: f64, confusion_matrix: ConfusionMatrix, estimator: E) -> Self {
        Self {
            score,
            confusion_matrix,
            estimator,
        }
    }

    /// Hold-out score.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Hold-out confusion matrix.
    #[must_use]
    pub const fn confusion_matrix(&self) -> &ConfusionMatrix {
        &self.confusion_matrix
    }

    /// The validated estimator.
    #[must_use]
    pub const fn estimator(&self) -> &E {
        &self.estimator
    }
}

/// Metrics for one trained candidate.
#[derive(Debug, Clone)]
pub enum ValidationResult<E> {
    /// k-fold validation
    Cross(CrossValidationResult<E>),
    /// Single hold-out split
    Basic(BasicValidationResult<E>),
}

impl<E> ValidationResult<E> {
    /// The trained estimator carried as the model artifact.
    #[must_use]
    pub const fn estimator(&self) -> &E {
        match self {
            Self::Cross(result) => &result.estimator,
            Self::Basic(result) => &result.estimator,
        }
    }

    /// Headline score: mean fold score or hold-out score.
    #[must_use]
    pub const fn score(&self) -> f64 {
        match self {
            Self::Cross(result) => result.summary.mean(),
            Self::Basic(result) => result.score,
        }
    }
}

impl<E: Estimator> fmt::Display for ValidationResult<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);
        match self {
            Self::Cross(result) => {
                let s = &result.summary;
                let (min, max) = s.min_max_score();
                writeln!(f, "Classification Cross-Validation Metrics")?;
                writeln!(f, "{rule}")?;
                writeln!(f, "Mean score                : {:.4}", s.mean())?;
                writeln!(f, "Standard deviation        : {:.4}", s.standard_deviation())?;
                writeln!(f, "Median score              : {:.4}", s.median())?;
                writeln!(f, "Score variance            : {:.4}", s.variance())?;
                writeln!(f, "Standard error of mean    : {:.4}", s.standard_error())?;
                writeln!(f, "Min score                 : {min:.4}")?;
                writeln!(f, "Max score                 : {max:.4}")?;
                writeln!(f, "Best estimator            : {}", result.estimator.configuration())?;
            }
            Self::Basic(result) => {
                writeln!(f, "Classification Basic Validation Metrics")?;
                writeln!(f, "{rule}")?;
                writeln!(f, "Score                     : {:.4}", result.score)?;
                writeln!(f, "Best estimator            : {}", result.estimator.configuration())?;
                writeln!(f, "Confusion matrix:")?;
                write!(f, "{}", result.confusion_matrix)?;
            }
        }
        writeln!(f, "{rule}")
    }
}

/// A validation strategy chosen at construction time.
#[derive(Debug, Clone)]
pub enum Validator {
    /// k-fold validation
    Cross(CrossValidator),
    /// Single hold-out split
    Basic(BasicValidator),
}

impl Validator {
    /// Validate the best candidate of a search.
    ///
    /// # Errors
    ///
    /// Fold, split and estimator failures propagate unmodified.
    pub fn validate<E: Estimator>(&mut self, outcome: &SearchOutcome<E>) -> Result<ValidationResult<E>> {
        match self {
            Self::Cross(validator) => validator.validate(outcome).map(ValidationResult::Cross),
            Self::Basic(validator) => validator.validate(outcome).map(ValidationResult::Basic),
        }
    }

    /// Timestamps of the last completed validation.
    #[must_use]
    pub const fn timing(&self) -> Option<Timing> {
        match self {
            Self::Cross(validator) => validator.timing(),
            Self::Basic(validator) => validator.timing(),
        }
    }

    /// Replace the seed used for folds or the hold-out split.
    pub fn set_seed(&mut self, seed: u64) {
        match self {
            Self::Cross(validator) => validator.config.seed = seed,
            Self::Basic(validator) => validator.config.seed = seed,
        }
    }
}

impl From<CrossValidator> for Validator {
    fn from(validator: CrossValidator) -> Self {
        Self::Cross(validator)
    }
}

impl From<BasicValidator> for Validator {
    fn from(validator: BasicValidator) -> Self {
        Self::Basic(validator)
    }
}
