//! # searchlog: Hyperparameter Search with Versioned Experiment History
//!
//! searchlog runs a hyperparameter search over any classifier that
//! implements [`estimator::Estimator`], validates the best configuration, and
//! keeps an append-only history of results with one saved model per entry so
//! a run can be replayed without searching again.
//!
//! ## Pipeline
//!
//! ```text
//! Dataset ──> Searcher (grid | random) ──> Validator (cross | basic)
//!                                              │
//!                                              v
//!                     HistoryStore (JSON log + model_N.bin) ──> report
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! # use searchlog::estimator::Estimator;
//! use searchlog::history::{HistoryConfig, HistoryStore};
//! use searchlog::params::{ParamDistribution, ParamSpace};
//! use searchlog::process::{ProcessConfig, ProcessManager};
//! use searchlog::search::{GridSearcher, SearchConfig};
//! use searchlog::validation::{CrossValidator, CrossValidatorConfig};
//!
//! # fn run<E: Estimator + Default>(data: searchlog::dataset::Dataset) -> searchlog::Result<()> {
//! let space = ParamSpace::new()
//!     .add("criterion", ParamDistribution::values(["gini", "entropy"]))
//!     .add("max_depth", ParamDistribution::values([3_i64, 5, 8]));
//!
//! let searcher = GridSearcher::new(data.clone(), space, E::default(), SearchConfig::default());
//! let validator = CrossValidator::new(data, CrossValidatorConfig::default());
//! let history = HistoryStore::new(HistoryConfig::new("history", "tree_models", "tree_best_params"));
//!
//! let mut manager = ProcessManager::new(
//!     ProcessConfig::default(),
//!     searcher.into(),
//!     validator.into(),
//!     history,
//! );
//! let report = manager.process(None)?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod analysis;
pub mod dataset;
pub mod error;
pub mod estimator;
pub mod history;
pub mod metrics;
pub mod params;
pub mod process;
pub mod search;
pub mod split;
pub mod timing;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
