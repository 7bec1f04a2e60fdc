//! Fold splitting for cross-validation and hold-out validation

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::{Error, Result};

/// How rows are divided into folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoldStrategy {
    /// Contiguous folds of (near) equal size
    KFold {
        /// Number of folds, at least 2
        n_splits: usize,
        /// Shuffle rows before folding
        shuffle: bool,
    },
    /// Folds that keep the class proportions of the labels
    StratifiedKFold {
        /// Number of folds, at least 2
        n_splits: usize,
        /// Shuffle rows within each class before folding
        shuffle: bool,
    },
}

impl Default for FoldStrategy {
    fn default() -> Self {
        Self::StratifiedKFold {
            n_splits: 5,
            shuffle: true,
        }
    }
}

/// One train/test partition of row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Rows used for fitting
    pub train_indices: Vec<usize>,
    /// Rows used for scoring
    pub test_indices: Vec<usize>,
    /// Position of this fold
    pub fold_idx: usize,
}

impl FoldStrategy {
    /// Number of folds produced.
    #[must_use]
    pub const fn n_splits(&self) -> usize {
        match self {
            Self::KFold { n_splits, .. } | Self::StratifiedKFold { n_splits, .. } => *n_splits,
        }
    }

    /// Partition the dataset rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if fewer than two folds are requested or
    /// there are fewer rows than folds.
    pub fn split(&self, data: &Dataset, seed: u64) -> Result<Vec<Fold>> {
        let n_splits = self.n_splits();
        let n_samples = data.n_samples();
        if n_splits < 2 {
            return Err(Error::InvalidData("n_splits must be at least 2".to_string()));
        }
        if n_samples < n_splits {
            return Err(Error::InvalidData(format!(
                "n_samples ({n_samples}) must be >= n_splits ({n_splits})"
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let folds = match self {
            Self::KFold { shuffle, .. } => {
                let mut indices: Vec<usize> = (0..n_samples).collect();
                if *shuffle {
                    indices.shuffle(&mut rng);
                }
                contiguous_folds(&indices, n_splits)
            }
            Self::StratifiedKFold { shuffle, .. } => {
                let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
                for (idx, &label) in data.labels().iter().enumerate() {
                    by_class.entry(label).or_default().push(idx);
                }

                let mut folds = vec![Vec::new(); n_splits];
                let mut offset = 0;
                for indices in by_class.values_mut() {
                    if *shuffle {
                        indices.shuffle(&mut rng);
                    }
                    for (i, &idx) in indices.iter().enumerate() {
                        folds[(offset + i) % n_splits].push(idx);
                    }
                    offset += indices.len();
                }
                folds
            }
        };

        Ok(into_splits(folds))
    }
}

fn contiguous_folds(indices: &[usize], n_splits: usize) -> Vec<Vec<usize>> {
    let base = indices.len() / n_splits;
    let remainder = indices.len() % n_splits;

    let mut folds = Vec::with_capacity(n_splits);
    let mut current = 0;
    for i in 0..n_splits {
        let size = if i < remainder { base + 1 } else { base };
        folds.push(indices[current..current + size].to_vec());
        current += size;
    }
    folds
}

fn into_splits(folds: Vec<Vec<usize>>) -> Vec<Fold> {
    (0..folds.len())
        .map(|fold_idx| Fold {
            train_indices: folds
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != fold_idx)
                .flat_map(|(_, f)| f.iter().copied())
                .collect(),
            test_indices: folds[fold_idx].clone(),
            fold_idx,
        })
        .collect()
}

/// Shuffle rows once and hold out `test_size` of them.
///
/// The test part gets `ceil(n * test_size)` rows; both parts are non-empty.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] if `test_size` is not in `(0, 1)` or the
/// split would leave either part empty.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<Fold> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidData(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(Error::InvalidData(format!(
            "test_size {test_size} leaves an empty split of {n_samples} samples"
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    let train_indices = indices.split_off(n_test);

    Ok(Fold {
        train_indices,
        test_indices: indices,
        fold_idx: 0,
    })
}
