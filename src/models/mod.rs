//! Frozen binary classifiers
//!
//! Models are fitted offline and loaded from their JSON artifact. Loading
//! validates the structure once, so prediction never re-checks it:
//! - Logistic regression
//! - Decision tree (flat node arrays)
//! - Random forest (probability-averaged decision trees)
//!
//! Tree models expose feature importances; logistic regression does not.

mod decision_tree;
mod linear_models;
mod random_forest;

pub use decision_tree::DecisionTree;
pub use linear_models::LogisticRegression;
pub use random_forest::RandomForest;

use crate::error::{LoanError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Number of classes every loan model predicts (0 = rejected, 1 = approved)
pub const N_CLASSES: usize = 2;

/// A fitted binary classifier
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Name of the model family as reported to clients
    fn model_type(&self) -> &'static str;

    /// Width of the feature rows the model was fitted on
    fn n_features(&self) -> usize;

    /// Class probabilities, one row per sample and one column per class
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Per-feature importances, when the model family has them
    fn feature_importances(&self) -> Option<&Array1<f64>> {
        None
    }
}

/// Any loan model artifact, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl Model {
    fn inner(&self) -> &dyn Classifier {
        match self {
            Model::LogisticRegression(m) => m,
            Model::DecisionTree(m) => m,
            Model::RandomForest(m) => m,
        }
    }
}

impl Classifier for Model {
    fn model_type(&self) -> &'static str {
        self.inner().model_type()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.inner().predict_proba(x)
    }

    fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.inner().feature_importances()
    }
}

/// Predicted class per row of a probability matrix. Ties go to the lower class.
pub fn predict_classes(proba: &Array2<f64>) -> Array1<usize> {
    proba.map_axis(Axis(1), |row| {
        row.iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (idx, &p)| {
                if p > best.1 {
                    (idx, p)
                } else {
                    best
                }
            })
            .0
    })
}

/// Reject input whose width differs from the fitted width.
pub(crate) fn check_width(x: &Array2<f64>, n_features: usize) -> Result<()> {
    if x.ncols() != n_features {
        return Err(LoanError::Shape {
            expected: format!("{} features", n_features),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(())
}

/// Validate a provided importance vector, or fall back to a computed one.
pub(crate) fn resolve_importances(
    provided: Option<Vec<f64>>,
    n_features: usize,
    compute: impl FnOnce() -> Array1<f64>,
) -> Result<Array1<f64>> {
    match provided {
        Some(values) => {
            if values.len() != n_features {
                return Err(LoanError::Shape {
                    expected: format!("{} feature importances", n_features),
                    actual: format!("{} feature importances", values.len()),
                });
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(LoanError::Serialization(
                    "feature importances must be finite".to_string(),
                ));
            }
            Ok(Array1::from_vec(values))
        }
        None => Ok(compute()),
    }
}

/// Scale a vector so it sums to one, leaving an all-zero vector untouched.
pub(crate) fn normalize_in_place(values: &mut Array1<f64>) {
    let total: f64 = values.sum();
    if total > 0.0 {
        values.mapv_inplace(|v| v / total);
    }
}
