//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use searchlog::dataset::Dataset;
use searchlog::estimator::Estimator;
use searchlog::history::{HistoryConfig, HistoryStore};
use searchlog::params::{ParamDistribution, ParamSet, ParamSpace, ParamValue};
use searchlog::{Error, Result};

/// Threshold classifier on a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stump {
    pub feature: usize,
    pub threshold: f64,
    pub sides: Option<(i64, i64)>,
}

impl Default for Stump {
    fn default() -> Self {
        Self {
            feature: 0,
            threshold: 0.5,
            sides: None,
        }
    }
}

fn majority<'a>(labels: impl Iterator<Item = &'a i64>) -> i64 {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0_usize) += 1;
    }
    let mut best = (0, 0_usize);
    for (label, count) in counts {
        if count > best.1 {
            best = (label, count);
        }
    }
    best.0
}

impl Estimator for Stump {
    fn fit(&mut self, data: &Dataset) -> Result<()> {
        let mut low = Vec::new();
        let mut high = Vec::new();
        for (x, y) in data.features().iter().zip(data.labels()) {
            if x[self.feature] <= self.threshold {
                low.push(*y);
            } else {
                high.push(*y);
            }
        }
        self.sides = Some((majority(low.iter()), majority(high.iter())));
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i64>> {
        let (low, high) = self
            .sides
            .ok_or_else(|| Error::Estimator("not fitted".to_string()))?;
        Ok(features
            .iter()
            .map(|x| if x[self.feature] <= self.threshold { low } else { high })
            .collect())
    }

    fn configuration(&self) -> ParamSet {
        ParamSet::new()
            .with("feature", i64::try_from(self.feature).unwrap())
            .with("threshold", self.threshold)
    }

    fn configure(&self, params: &ParamSet) -> Result<Self> {
        let mut next = Self {
            sides: None,
            ..self.clone()
        };
        for (name, value) in params.iter() {
            match (name, value) {
                ("feature", ParamValue::Int(v)) => next.feature = usize::try_from(*v).unwrap(),
                ("threshold", v) => next.threshold = v.as_f64().unwrap(),
                _ => return Err(Error::Estimator(format!("unknown parameter {name}"))),
            }
        }
        Ok(next)
    }
}

/// 60 rows, label is `x0 > 0.5`, `x1` is noise.
pub fn dataset() -> Dataset {
    let features: Vec<Vec<f64>> = (0..60)
        .map(|i| vec![f64::from(i) / 60.0, f64::from((i * 13) % 17) / 17.0])
        .collect();
    let labels = features.iter().map(|x| i64::from(x[0] > 0.5)).collect();
    Dataset::new(features, labels).unwrap()
}

/// Two features times three thresholds.
pub fn grid_space() -> ParamSpace {
    ParamSpace::new()
        .add("feature", ParamDistribution::values([0_i64, 1]))
        .add("threshold", ParamDistribution::values([0.3, 0.5, 0.7]))
}

/// Fresh store rooted in a temporary directory.
pub fn store(dir: &tempfile::TempDir) -> HistoryStore<Stump> {
    HistoryStore::new(HistoryConfig::new(dir.path(), "models", "stump_best_params"))
}
