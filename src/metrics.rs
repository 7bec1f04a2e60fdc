//! Scoring and score statistics
//!
//! [`ScoreSummary`] is always derived from a raw score sequence; its
//! standard error and min/max are never supplied independently.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Scoring function used by searchers and validators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Fraction of exactly matching labels
    #[default]
    Accuracy,
}

impl Scoring {
    /// Score predictions against the truth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the slices are empty or differ in length.
    pub fn score(self, y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
        match self {
            Self::Accuracy => accuracy(y_true, y_pred),
        }
    }
}

fn check_lengths(y_true: &[i64], y_pred: &[i64]) -> Result<()> {
    if y_true.is_empty() {
        return Err(Error::InvalidData("cannot score an empty prediction set".to_string()));
    }
    if y_true.len() != y_pred.len() {
        return Err(Error::InvalidData(format!(
            "{} true labels but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

/// Fraction of predictions equal to the true label.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] if the slices are empty or differ in length.
#[allow(clippy::cast_precision_loss)]
pub fn accuracy(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let hits = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(hits as f64 / y_true.len() as f64)
}

/// Square matrix of counts: rows are true labels, columns predicted labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<i64>,
    counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Build from truth and predictions. Labels are the sorted union of both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the slices are empty or differ in length.
    pub fn from_predictions(y_true: &[i64], y_pred: &[i64]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;

        let mut labels: Vec<i64> = y_true.iter().chain(y_pred).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let mut counts = vec![vec![0_u64; labels.len()]; labels.len()];
        for (t, p) in y_true.iter().zip(y_pred) {
            // both present in `labels` by construction
            if let (Ok(row), Ok(col)) = (labels.binary_search(t), labels.binary_search(p)) {
                counts[row][col] += 1;
            }
        }

        Ok(Self { labels, counts })
    }

    /// Rebuild from stored counts; labels are assumed to be `0..n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the matrix is not square.
    pub fn from_counts(counts: Vec<Vec<u64>>) -> Result<Self> {
        let n = counts.len();
        if counts.iter().any(|row| row.len() != n) {
            return Err(Error::InvalidData("confusion matrix must be square".to_string()));
        }
        let labels = (0..n).map(|i| i64::try_from(i).unwrap_or(i64::MAX)).collect();
        Ok(Self { labels, counts })
    }

    /// Replace the row/column labels (ascending order).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the label count does not match the matrix size.
    pub fn with_labels(mut self, labels: Vec<i64>) -> Result<Self> {
        if labels.len() != self.counts.len() {
            return Err(Error::InvalidData(format!(
                "{} labels for a {n}x{n} confusion matrix",
                labels.len(),
                n = self.counts.len()
            )));
        }
        self.labels = labels;
        Ok(self)
    }

    /// Class labels indexing rows and columns.
    #[must_use]
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Raw counts.
    #[must_use]
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Count for a (true, predicted) label pair.
    #[must_use]
    pub fn get(&self, true_label: i64, predicted: i64) -> u64 {
        match (
            self.labels.binary_search(&true_label),
            self.labels.binary_search(&predicted),
        ) {
            (Ok(row), Ok(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    /// Total number of scored samples.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        for (i, row) in self.counts.iter().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == self.counts.len() { "]]" } else { "]" };
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            writeln!(f, "{open}{}{close}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Descriptive statistics over per-fold scores.
///
/// Standard deviation and variance are population statistics (ddof = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    mean: f64,
    standard_deviation: f64,
    median: f64,
    variance: f64,
    standard_error: f64,
    min_max_score: (f64, f64),
}

impl ScoreSummary {
    /// Summarise a score sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for an empty sequence.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_scores(scores: &[f64]) -> Result<Self> {
        if scores.is_empty() {
            return Err(Error::InvalidData("no scores to summarise".to_string()));
        }

        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        let standard_deviation = variance.sqrt();

        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Ok(Self {
            mean,
            standard_deviation,
            median,
            variance,
            standard_error: standard_deviation / n.sqrt(),
            min_max_score: (sorted[0], sorted[sorted.len() - 1]),
        })
    }

    /// Restore a summary persisted in the history log.
    pub(crate) const fn from_stored(
        mean: f64,
        standard_deviation: f64,
        median: f64,
        variance: f64,
        standard_error: f64,
        min_max_score: (f64, f64),
    ) -> Self {
        Self {
            mean,
            standard_deviation,
            median,
            variance,
            standard_error,
            min_max_score,
        }
    }

    /// Mean score.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation.
    #[must_use]
    pub const fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }

    /// Median score.
    #[must_use]
    pub const fn median(&self) -> f64 {
        self.median
    }

    /// Population variance.
    #[must_use]
    pub const fn variance(&self) -> f64 {
        self.variance
    }

    /// Standard error of the mean, `std / sqrt(n)`.
    #[must_use]
    pub const fn standard_error(&self) -> f64 {
        self.standard_error
    }

    /// Lowest and highest score.
    #[must_use]
    pub const fn min_max_score(&self) -> (f64, f64) {
        self.min_max_score
    }
}
