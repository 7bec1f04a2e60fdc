//! Hyperparameter search
//!
//! Two strategies share one evaluation loop:
//!
//! - [`GridSearcher`] enumerates every combination of the declared value lists
//! - [`RandomSearcher`] samples a fixed number of configurations
//!
//! Every candidate is scored on the same folds with the same scoring
//! function. The best configuration is refit on the full dataset and
//! returned in a [`SearchOutcome`].
//!
//! ```text
//! ParamSpace ──> candidates ──> fold scores ──> ranks ──> best refit
//! ```

mod grid;
mod random;

pub use grid::GridSearcher;
pub use random::RandomSearcher;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::estimator::Estimator;
use crate::metrics::{ScoreSummary, Scoring};
use crate::params::{ParamSet, ParamSpace};
use crate::split::{Fold, FoldStrategy};
use crate::timing::Timing;
use crate::Result;

/// Settings shared by both search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fold strategy used to score every candidate
    pub cv: FoldStrategy,
    /// Worker count hint; `None` uses every core
    pub n_jobs: Option<usize>,
    /// Scoring function
    pub scoring: Scoring,
    /// Seed for fold shuffling and sampling
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cv: FoldStrategy::default(),
            n_jobs: None,
            scoring: Scoring::Accuracy,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Set the fold strategy.
    #[must_use]
    pub const fn with_cv(mut self, cv: FoldStrategy) -> Self {
        self.cv = cv;
        self
    }

    /// Set the worker count hint.
    #[must_use]
    pub const fn with_n_jobs(mut self, n_jobs: Option<usize>) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Set the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Score of one evaluated configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// The configuration
    pub params: ParamSet,
    /// Score on each fold
    pub fold_scores: Vec<f64>,
    /// Mean of the fold scores
    pub mean_test_score: f64,
    /// Population standard deviation of the fold scores
    pub std_test_score: f64,
    /// 1 is best; ties share the lower rank
    pub rank_test_score: usize,
}

/// Result of a finished search.
#[derive(Debug, Clone)]
pub struct SearchOutcome<E> {
    /// Configuration with the best mean score
    pub best_params: ParamSet,
    /// Its mean score
    pub best_score: f64,
    /// Estimator with the best configuration, refit on the whole dataset
    pub best_estimator: E,
    /// Every evaluated candidate, in evaluation order
    pub candidates: Vec<CandidateScore>,
    /// Wall-clock span of the search
    pub timing: Timing,
}

/// Common inputs of a search: data, space, prototype estimator, settings.
#[derive(Debug, Clone)]
pub struct SearchSetup<E> {
    /// Prepared training data
    pub data: Dataset,
    /// Declared parameter space
    pub space: ParamSpace,
    /// Prototype estimator; candidates are `configure`d copies
    pub estimator: E,
    /// Search settings
    pub config: SearchConfig,
}

impl<E: Estimator> SearchSetup<E> {
    /// Bundle the search inputs.
    #[must_use]
    pub const fn new(data: Dataset, space: ParamSpace, estimator: E, config: SearchConfig) -> Self {
        Self {
            data,
            space,
            estimator,
            config,
        }
    }

    /// Score every candidate, rank them and refit the best one.
    fn run(&self, candidates: Vec<ParamSet>) -> Result<SearchOutcome<E>> {
        if candidates.is_empty() {
            return Err(crate::Error::InvalidParamSpace(
                "no candidate configurations to evaluate".to_string(),
            ));
        }
        let started_at = Utc::now();
        tracing::info!(
            candidates = candidates.len(),
            folds = self.config.cv.n_splits(),
            "starting hyperparameter search"
        );

        let folds = self.config.cv.split(&self.data, self.config.seed)?;
        let mut scored = self.evaluate_all(&candidates, &folds)?;
        assign_ranks(&mut scored);

        // first candidate in evaluation order wins ties
        let best_idx = scored
            .iter()
            .position(|c| c.rank_test_score == 1)
            .unwrap_or_default();
        let best = &scored[best_idx];

        let mut best_estimator = self.estimator.configure(&best.params)?;
        best_estimator.fit(&self.data)?;

        let ended_at = Utc::now();
        tracing::info!(
            best_score = best.mean_test_score,
            best_params = %best.params,
            "hyperparameter search finished"
        );

        Ok(SearchOutcome {
            best_params: best.params.clone(),
            best_score: best.mean_test_score,
            best_estimator,
            candidates: scored,
            timing: Timing::new(started_at, ended_at),
        })
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&self, candidates: &[ParamSet], folds: &[Fold]) -> Result<Vec<CandidateScore>> {
        use rayon::prelude::*;

        let run = || {
            candidates
                .par_iter()
                .map(|params| self.evaluate(params, folds))
                .collect::<Result<Vec<_>>>()
        };

        match self.config.n_jobs {
            Some(1) => candidates.iter().map(|p| self.evaluate(p, folds)).collect(),
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| crate::Error::WorkerPool(e.to_string()))?
                .install(run),
            None => run(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&self, candidates: &[ParamSet], folds: &[Fold]) -> Result<Vec<CandidateScore>> {
        candidates.iter().map(|p| self.evaluate(p, folds)).collect()
    }

    fn evaluate(&self, params: &ParamSet, folds: &[Fold]) -> Result<CandidateScore> {
        let prototype = self.estimator.configure(params)?;
        let fold_scores = score_folds(&prototype, &self.data, folds, self.config.scoring)?;
        let summary = ScoreSummary::from_scores(&fold_scores)?;
        tracing::debug!(params = %params, mean = summary.mean(), "candidate evaluated");

        Ok(CandidateScore {
            params: params.clone(),
            fold_scores,
            mean_test_score: summary.mean(),
            std_test_score: summary.standard_deviation(),
            rank_test_score: 0,
        })
    }
}

/// Fit a fresh copy of `prototype` on each training part and score the held-out part.
pub(crate) fn score_folds<E: Estimator>(
    prototype: &E,
    data: &Dataset,
    folds: &[Fold],
    scoring: Scoring,
) -> Result<Vec<f64>> {
    folds
        .iter()
        .map(|fold| {
            let train = data.select(&fold.train_indices)?;
            let test = data.select(&fold.test_indices)?;
            let mut estimator = prototype.clone();
            estimator.fit(&train)?;
            let predictions = estimator.predict(test.features())?;
            scoring.score(test.labels(), &predictions)
        })
        .collect()
}

fn assign_ranks(candidates: &mut [CandidateScore]) {
    let means: Vec<f64> = candidates.iter().map(|c| c.mean_test_score).collect();
    for candidate in candidates.iter_mut() {
        let better = means
            .iter()
            .filter(|&&m| m > candidate.mean_test_score)
            .count();
        candidate.rank_test_score = better + 1;
    }
}

/// A search strategy chosen at construction time.
#[derive(Debug, Clone)]
pub enum Searcher<E> {
    /// Exhaustive enumeration of discrete value lists
    Grid(GridSearcher<E>),
    /// Fixed-budget random sampling
    Random(RandomSearcher<E>),
}

impl<E: Estimator> Searcher<E> {
    /// Run the search.
    ///
    /// `iteration_count` is required for random search and ignored by grid search.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::MissingIterations`] for random search without a count
    /// - [`crate::Error::InvalidParamSpace`] for a malformed space
    /// - any fold or estimator failure, unmodified
    pub fn search_hyperparameters(&mut self, iteration_count: Option<usize>) -> Result<SearchOutcome<E>> {
        match self {
            Self::Grid(searcher) => searcher.search_hyperparameters(iteration_count),
            Self::Random(searcher) => searcher.search_hyperparameters(iteration_count),
        }
    }

    /// Timestamps of the last completed search.
    #[must_use]
    pub const fn timing(&self) -> Option<Timing> {
        match self {
            Self::Grid(searcher) => searcher.timing(),
            Self::Random(searcher) => searcher.timing(),
        }
    }

    /// Replace the seed used for folds and sampling.
    pub fn set_seed(&mut self, seed: u64) {
        match self {
            Self::Grid(searcher) => searcher.setup.config.seed = seed,
            Self::Random(searcher) => searcher.setup.config.seed = seed,
        }
    }

    /// Search inputs.
    #[must_use]
    pub const fn setup(&self) -> &SearchSetup<E> {
        match self {
            Self::Grid(searcher) => &searcher.setup,
            Self::Random(searcher) => &searcher.setup,
        }
    }
}

impl<E> From<GridSearcher<E>> for Searcher<E> {
    fn from(searcher: GridSearcher<E>) -> Self {
        Self::Grid(searcher)
    }
}

impl<E> From<RandomSearcher<E>> for Searcher<E> {
    fn from(searcher: RandomSearcher<E>) -> Self {
        Self::Random(searcher)
    }
}
