//! Experiment History - append-only log of validation results plus model artifacts
//!
//! ## Layout
//!
//! ```text
//! <output_directory>/
//! ├── <params_file_name>.json        [HistoryEntry, HistoryEntry, ...]
//! └── <models_directory>/
//!     ├── model_1.bin                 artifact of entry 0
//!     └── model_2.bin                 artifact of entry 1
//! ```
//!
//! Entry `i` always has exactly one artifact, versioned `i + 1`. Entries are
//! appended, never edited or removed.
//!
//! ## Write ordering
//!
//! `save_result` writes the artifact first, then rewrites the whole log. Both
//! writes go to a temporary file that is renamed into place. If the log
//! rewrite fails the new artifact is removed again, so a failed save leaves
//! the store exactly as it was.
//!
//! ## Concurrency
//!
//! One writer per log. The read-modify-rewrite append is not locked: two
//! processes saving to the same log at once can lose an entry or pair an
//! entry with the other process's artifact.

mod entry;

pub use entry::{BasicValidationEntry, CrossValidationEntry, HistoryEntry};

use std::fs::{self, File};
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::estimator::Estimator;
use crate::validation::ValidationResult;
use crate::{Error, Result};

/// Where an experiment's history lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Root directory of the log and the models directory
    pub output_directory: PathBuf,
    /// Models directory, relative to `output_directory`
    pub models_directory: PathBuf,
    /// Log file name without the `.json` extension
    pub params_file_name: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("history"),
            models_directory: PathBuf::from("models"),
            params_file_name: "best_params".to_string(),
        }
    }
}

impl HistoryConfig {
    /// Create a config from its three parts.
    #[must_use]
    pub fn new(
        output_directory: impl Into<PathBuf>,
        models_directory: impl Into<PathBuf>,
        params_file_name: impl Into<String>,
    ) -> Self {
        Self {
            output_directory: output_directory.into(),
            models_directory: models_directory.into(),
            params_file_name: params_file_name.into(),
        }
    }

    /// Load a config from a JSON file; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// IO or JSON errors.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Persistent store of results for one named experiment.
#[derive(Debug, Clone)]
pub struct HistoryStore<E> {
    config: HistoryConfig,
    _estimator: PhantomData<fn() -> E>,
}

impl<E: Estimator> HistoryStore<E> {
    /// Create a store; nothing is touched on disk until the first save.
    #[must_use]
    pub const fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            _estimator: PhantomData,
        }
    }

    /// Store configuration.
    #[must_use]
    pub const fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Path of the JSON log.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.config
            .output_directory
            .join(format!("{}.json", self.config.params_file_name))
    }

    /// Directory holding the model artifacts.
    #[must_use]
    pub fn models_dir(&self) -> PathBuf {
        self.config.output_directory.join(&self.config.models_directory)
    }

    /// Path of the artifact with the given version.
    #[must_use]
    pub fn model_path(&self, version: usize) -> PathBuf {
        self.models_dir().join(format!("model_{version}.bin"))
    }

    /// True if the log exists and holds at least one entry.
    ///
    /// An unreadable log counts as no history and is logged as a warning.
    #[must_use]
    pub fn has_history(&self) -> bool {
        match self.entries() {
            Ok(entries) => !entries.is_empty(),
            Err(Error::HistoryNotFound { .. }) => false,
            Err(e) => {
                tracing::warn!(path = %self.log_path().display(), error = %e, "unreadable history log");
                false
            }
        }
    }

    /// Number of entries; zero if the log does not exist.
    ///
    /// # Errors
    ///
    /// IO or JSON errors reading an existing log.
    pub fn history_len(&self) -> Result<usize> {
        Ok(self.entries_or_empty()?.len())
    }

    /// All entries in insertion order.
    ///
    /// # Errors
    ///
    /// [`Error::HistoryNotFound`] if the log does not exist; IO or JSON errors otherwise.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        let path = self.log_path();
        if !path.exists() {
            return Err(Error::HistoryNotFound { path });
        }
        let file = File::open(&path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn entries_or_empty(&self) -> Result<Vec<HistoryEntry>> {
        match self.entries() {
            Err(Error::HistoryNotFound { .. }) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Entry at `index`; `-1` selects the last one.
    ///
    /// # Errors
    ///
    /// [`Error::HistoryNotFound`] without a log, [`Error::IndexOutOfRange`]
    /// outside `[-1, len)`.
    pub fn entry(&self, index: i64) -> Result<HistoryEntry> {
        let mut entries = self.entries()?;
        let position = resolve_index(index, entries.len())?;
        Ok(entries.swap_remove(position))
    }

    /// Persist a result and its trained estimator.
    ///
    /// Returns the artifact version, equal to the log length after the append.
    /// Call at most once per experiment run.
    ///
    /// # Errors
    ///
    /// IO and serialization errors. On error neither the log nor the
    /// models directory gains a new file.
    pub fn save_result(
        &self,
        result: &ValidationResult<E>,
        search_time: &str,
        validation_time: &str,
    ) -> Result<usize> {
        fs::create_dir_all(&self.config.output_directory)?;
        fs::create_dir_all(self.models_dir())?;

        let mut entries = self.entries_or_empty()?;
        let version = entries.len() + 1;
        let model_path = self.model_path(version);

        let artifact = bincode::serialize(result.estimator())?;
        write_atomically(&model_path, &artifact)?;

        entries.push(HistoryEntry::from_result(result, search_time, validation_time));
        let log_bytes = serde_json::to_vec_pretty(&entries);
        let log_write = log_bytes
            .map_err(Error::from)
            .and_then(|bytes| write_atomically(&self.log_path(), &bytes));

        if let Err(e) = log_write {
            tracing::warn!(version, error = %e, "history log write failed, removing artifact");
            return match fs::remove_file(&model_path) {
                Ok(()) => Err(e),
                Err(cleanup) => Err(Error::InconsistentHistory(format!(
                    "log append failed ({e}) and artifact {} could not be removed ({cleanup})",
                    model_path.display()
                ))),
            };
        }

        tracing::info!(
            path = %self.log_path().display(),
            version,
            "saved result to history"
        );
        Ok(version)
    }

    /// Rebuild a result from the log.
    ///
    /// Metrics come from entry `index` (`-1` = last). The estimator is always
    /// the latest artifact (version = log length), whichever entry is selected.
    ///
    /// # Errors
    ///
    /// [`Error::HistoryNotFound`], [`Error::IndexOutOfRange`] or
    /// [`Error::ModelNotFound`].
    pub fn load_result_from_history(&self, index: i64) -> Result<ValidationResult<E>> {
        let mut entries = self.entries()?;
        let len = entries.len();
        let position = resolve_index(index, len)?;
        let entry = entries.swap_remove(position);

        let estimator = self.get_saved_model(len)?;
        tracing::info!(index, position, model_version = len, "loaded result from history");
        entry.to_result(estimator)
    }

    /// Deserialize the artifact with the given version.
    ///
    /// # Errors
    ///
    /// [`Error::ModelNotFound`] if the file is missing; IO or artifact errors otherwise.
    pub fn get_saved_model(&self, version: usize) -> Result<E> {
        let path = self.model_path(version);
        if !path.exists() {
            return Err(Error::ModelNotFound { version, path });
        }
        let file = File::open(&path)?;
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }
}

fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let out_of_range = || Error::IndexOutOfRange { index, len };
    if index == -1 {
        return len.checked_sub(1).ok_or_else(out_of_range);
    }
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(out_of_range)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            tracing::warn!(path = %tmp.display(), error = %cleanup, "could not remove temporary file");
        }
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index_bounds() {
        assert_eq!(resolve_index(-1, 3).unwrap(), 2);
        assert_eq!(resolve_index(0, 3).unwrap(), 0);
        assert_eq!(resolve_index(2, 3).unwrap(), 2);
        assert!(matches!(
            resolve_index(3, 3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(resolve_index(-2, 3).is_err());
        assert!(resolve_index(-1, 0).is_err());
    }

    #[test]
    fn test_history_config_paths() {
        let config = HistoryConfig::new("history", "tree_models", "tree_best_params");
        let store: HistoryStore<crate::test_support::StumpClassifier> = HistoryStore::new(config);
        assert_eq!(store.log_path(), Path::new("history/tree_best_params.json"));
        assert_eq!(store.model_path(3), Path::new("history/tree_models/model_3.bin"));
    }

    #[test]
    fn test_history_config_defaults_from_json() {
        let config: HistoryConfig =
            serde_json::from_str(r#"{"params_file_name": "knn_best_params"}"#).unwrap();
        assert_eq!(config.output_directory, PathBuf::from("history"));
        assert_eq!(config.params_file_name, "knn_best_params");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // renaming a file onto a non-empty directory fails
        let target = dir.path().join("log.json");
        fs::create_dir_all(target.join("occupied")).unwrap();

        assert!(matches!(write_atomically(&target, b"[]"), Err(Error::Io(_))));
        assert!(!target.with_extension("tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn test_write_atomically_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("log.json");
        write_atomically(&target, b"[1]").unwrap();
        write_atomically(&target, b"[1,2]").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"[1,2]");
        assert!(!target.with_extension("tmp").exists());
    }

    #[test]
    fn test_history_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, r#"{"output_directory": "runs", "models_directory": "svm_models"}"#).unwrap();

        let config = HistoryConfig::from_json_file(&path).unwrap();
        assert_eq!(config.output_directory, PathBuf::from("runs"));
        assert_eq!(config.models_directory, PathBuf::from("svm_models"));
        assert_eq!(config.params_file_name, HistoryConfig::default().params_file_name);

        assert!(HistoryConfig::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
