//! Fixed-budget random search

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{SearchConfig, SearchOutcome, SearchSetup};
use crate::dataset::Dataset;
use crate::estimator::Estimator;
use crate::params::ParamSpace;
use crate::timing::Timing;
use crate::{Error, Result};

/// Samples exactly `n` configurations from the declared distributions.
///
/// Sampling is with replacement, so `n` may exceed the size of a discrete
/// space. The same seed yields the same candidates.
#[derive(Debug, Clone)]
pub struct RandomSearcher<E> {
    pub(super) setup: SearchSetup<E>,
    timing: Option<Timing>,
}

impl<E: Estimator> RandomSearcher<E> {
    /// Create a random searcher.
    #[must_use]
    pub const fn new(data: Dataset, space: ParamSpace, estimator: E, config: SearchConfig) -> Self {
        Self {
            setup: SearchSetup::new(data, space, estimator, config),
            timing: None,
        }
    }

    /// Sample and evaluate `iteration_count` candidates.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingIterations`] if `iteration_count` is `None`
    /// - [`Error::InvalidParamSpace`] for a zero count or a malformed space
    /// - folding or estimator failures
    pub fn search_hyperparameters(&mut self, iteration_count: Option<usize>) -> Result<SearchOutcome<E>> {
        let n_iter = iteration_count.ok_or(Error::MissingIterations)?;
        if n_iter == 0 {
            return Err(Error::InvalidParamSpace(
                "iteration count must be at least 1".to_string(),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.setup.config.seed);
        let candidates = (0..n_iter)
            .map(|_| self.setup.space.sample(&mut rng))
            .collect::<Result<Vec<_>>>()?;

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
