//! Process orchestration: search, validate, save, present
//!
//! Two paths, chosen once from [`ProcessConfig::history_index`]:
//!
//! ```text
//! fresh:   Search ──> Validate ──> Save (if enabled) ──> Present
//! replay:  Load from history ─────────────────────────> Present
//! ```
//!
//! A replay never writes to the history.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::estimator::Estimator;
use crate::history::HistoryStore;
use crate::search::{SearchOutcome, Searcher};
use crate::timing::{format_duration, Timing};
use crate::validation::{ValidationResult, Validator};
use crate::Result;

/// Settings of one experiment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Seed handed to the searcher and the validator
    pub seed: u64,
    /// Persist fresh results
    pub save_history: bool,
    /// Replay this history entry instead of searching (`-1` = last)
    pub history_index: Option<i64>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            save_history: true,
            history_index: None,
        }
    }
}

impl ProcessConfig {
    /// Run with the given seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable saving fresh results.
    #[must_use]
    pub const fn with_save_history(mut self, save_history: bool) -> Self {
        self.save_history = save_history;
        self
    }

    /// Replay a history entry.
    #[must_use]
    pub const fn with_history_index(mut self, index: Option<i64>) -> Self {
        self.history_index = index;
        self
    }
}

/// What a run produced, ready for presentation.
#[derive(Debug, Clone)]
pub struct ProcessReport<E> {
    /// Validation metrics and trained estimator
    pub result: ValidationResult<E>,
    /// Full search outcome; `None` on replay
    pub search_outcome: Option<SearchOutcome<E>>,
    /// `HH:MM:SS`
    pub search_time: String,
    /// `HH:MM:SS`
    pub validation_time: String,
    /// Artifact version written by this run, if any
    pub version: Option<usize>,
}

impl<E> ProcessReport<E> {
    /// True if the result was loaded from history.
    #[must_use]
    pub const fn replayed(&self) -> bool {
        self.search_outcome.is_none()
    }
}

impl<E: Estimator> fmt::Display for ProcessReport<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)?;
        writeln!(f, "Search time               : {}", self.search_time)?;
        writeln!(f, "Validation time           : {}", self.validation_time)
    }
}

/// Sequences searcher, validator and history store for one experiment.
#[derive(Debug)]
pub struct ProcessManager<E> {
    config: ProcessConfig,
    searcher: Searcher<E>,
    validator: Validator,
    history: HistoryStore<E>,
}

impl<E: Estimator> ProcessManager<E> {
    /// Wire the components together; the config seed replaces their own seeds.
    #[must_use]
    pub fn new(
        config: ProcessConfig,
        mut searcher: Searcher<E>,
        mut validator: Validator,
        history: HistoryStore<E>,
    ) -> Self {
        searcher.set_seed(config.seed);
        validator.set_seed(config.seed);
        Self {
            config,
            searcher,
            validator,
            history,
        }
    }

    /// Run configuration.
    #[must_use]
    pub const fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// The history store.
    #[must_use]
    pub const fn history(&self) -> &HistoryStore<E> {
        &self.history
    }

    /// Run the experiment, or replay it from history.
    ///
    /// `iteration_count` is forwarded to the searcher on a fresh run.
    ///
    /// # Errors
    ///
    /// Any search, validation or history error; nothing is saved after a failure.
    pub fn process(&mut self, iteration_count: Option<usize>) -> Result<ProcessReport<E>> {
        let report = match self.config.history_index {
            Some(index) => self.replay(index)?,
            None => self.run_fresh(iteration_count)?,
        };

        tracing::info!(
            score = report.result.score(),
            search_time = %report.search_time,
            validation_time = %report.validation_time,
            replayed = report.replayed(),
            "experiment finished"
        );
        Ok(report)
    }

    fn run_fresh(&mut self, iteration_count: Option<usize>) -> Result<ProcessReport<E>> {
        let outcome = self.searcher.search_hyperparameters(iteration_count)?;
        let result = self.validator.validate(&outcome)?;

        let search_time = outcome.timing.formatted();
        let validation_time = self
            .validator
            .timing()
            .as_ref()
            .map_or_else(|| format_duration(Duration::zero()), Timing::formatted);

        let version = if self.config.save_history {
            Some(self.history.save_result(&result, &search_time, &validation_time)?)
        } else {
            None
        };

        Ok(ProcessReport {
            result,
            search_outcome: Some(outcome),
            search_time,
            validation_time,
            version,
        })
    }

    fn replay(&self, index: i64) -> Result<ProcessReport<E>> {
        tracing::info!(index, path = %self.history.log_path().display(), "replaying from history");
        let result = self.history.load_result_from_history(index)?;
        let zero = format_duration(Duration::zero());

        Ok(ProcessReport {
            result,
            search_outcome: None,
            search_time: zero.clone(),
            validation_time: zero,
            version: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_config_from_json() {
        let config: ProcessConfig = serde_json::from_str(r#"{"history_index": -1}"#).unwrap();
        assert_eq!(config.seed, 42);
        assert!(config.save_history);
        assert_eq!(config.history_index, Some(-1));
    }

    #[test]
    fn test_process_config_builder() {
        let config = ProcessConfig::default()
            .with_seed(7)
            .with_save_history(false)
            .with_history_index(Some(0));
        assert_eq!(config.seed, 7);
        assert!(!config.save_history);
        assert_eq!(config.history_index, Some(0));
    }
}
