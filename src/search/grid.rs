//! Exhaustive grid search

use super::{SearchConfig, SearchOutcome, SearchSetup};
use crate::dataset::Dataset;
use crate::estimator::Estimator;
use crate::params::ParamSpace;
use crate::timing::Timing;
use crate::Result;

/// Evaluates the full Cartesian product of the declared value lists.
///
/// The candidate count is the product of the list lengths. Continuous or
/// integer-range distributions are rejected because they cannot be enumerated.
#[derive(Debug, Clone)]
pub struct GridSearcher<E> {
    pub(super) setup: SearchSetup<E>,
    timing: Option<Timing>,
}

impl<E: Estimator> GridSearcher<E> {
    /// Create a grid searcher.
    #[must_use]
    pub const fn new(data: Dataset, space: ParamSpace, estimator: E, config: SearchConfig) -> Self {
        Self {
            setup: SearchSetup::new(data, space, estimator, config),
            timing: None,
        }
    }

    /// Number of candidates a search would evaluate, if the space is enumerable.
    #[must_use]
    pub fn candidate_count(&self) -> Option<usize> {
        self.setup.space.grid_size()
    }

    /// Evaluate every grid point. `iteration_count` is ignored.
    ///
    /// # Errors
    ///
    /// Fails for a non-enumerable or malformed space, or when folding or the
    /// estimator fails.
    pub fn search_hyperparameters(&mut self, iteration_count: Option<usize>) -> Result<SearchOutcome<E>> {
        if let Some(n) = iteration_count {
            tracing::debug!(iterations = n, "grid search ignores the iteration count");
        }

        let candidates = self.setup.space.grid()?;
        let outcome = self.setup.run(candidates)?;
        self.timing = Some(outcome.timing);
        Ok(outcome)
    }

    /// Timestamps of the last completed search.
    #[must_use]
    pub const fn timing(&self) -> Option<Timing> {
        self.timing
    }
}
