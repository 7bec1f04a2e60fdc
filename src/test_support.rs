//! Fixture estimator shared by unit tests

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::estimator::Estimator;
use crate::params::{ParamSet, ParamValue};
use crate::{Error, Result};

/// One-split classifier: predicts the majority label on each side of a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StumpClassifier {
    pub feature: usize,
    pub threshold: f64,
    pub sides: Option<(i64, i64)>,
}

impl Default for StumpClassifier {
    fn default() -> Self {
        Self {
            feature: 0,
            threshold: 0.5,
            sides: None,
        }
    }
}

fn majority(labels: impl Iterator<Item = i64>) -> i64 {
    let mut counts = std::collections::BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0_usize) += 1;
    }
    // ties go to the smaller label
    let mut best = (0, 0_usize);
    for (label, count) in counts {
        if count > best.1 {
            best = (label, count);
        }
    }
    best.0
}

impl Estimator for StumpClassifier {
    fn fit(&mut self, data: &Dataset) -> Result<()> {
        let rows = data.features().iter().zip(data.labels());
        let (low, high): (Vec<_>, Vec<_>) = rows.partition(|(x, _)| x[self.feature] <= self.threshold);
        self.sides = Some((
            majority(low.into_iter().map(|(_, &y)| y)),
            majority(high.into_iter().map(|(_, &y)| y)),
        ));
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i64>> {
        let (low, high) = self
            .sides
            .ok_or_else(|| Error::Estimator("stump is not fitted".to_string()))?;
        Ok(features
            .iter()
            .map(|x| if x[self.feature] <= self.threshold { low } else { high })
            .collect())
    }

    fn configuration(&self) -> ParamSet {
        ParamSet::new()
            .with("feature", i64::try_from(self.feature).unwrap_or(i64::MAX))
            .with("threshold", self.threshold)
    }

    fn configure(&self, params: &ParamSet) -> Result<Self> {
        let mut next = Self {
            sides: None,
            ..self.clone()
        };
        for (name, value) in params.iter() {
            match (name, value) {
                ("feature", ParamValue::Int(v)) => {
                    next.feature = usize::try_from(*v).map_err(|e| Error::Estimator(e.to_string()))?;
                }
                ("threshold", v) => {
                    next.threshold = v
                        .as_f64()
                        .ok_or_else(|| Error::Estimator(format!("bad threshold {v}")))?;
                }
                _ => return Err(Error::Estimator(format!("unknown parameter {name}={value}"))),
            }
        }
        Ok(next)
    }
}

/// 40 rows: label is 1 when `x0 > 0.5`, `x1` is noise.
pub fn separable() -> Dataset {
    let features: Vec<Vec<f64>> = (0..40)
        .map(|i| {
            let x0 = f64::from(i) / 40.0;
            let x1 = f64::from((i * 7) % 11) / 11.0;
            vec![x0, x1]
        })
        .collect();
    let labels = features.iter().map(|x| i64::from(x[0] > 0.5)).collect();
    Dataset::new(features, labels).unwrap()
}
