//! Random forest classifier

use super::{check_width, normalize_in_place, resolve_importances, Classifier, DecisionTree, N_CLASSES};
use crate::error::{LoanError, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestParams {
    n_features: usize,
    trees: Vec<DecisionTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_importances: Option<Vec<f64>>,
}

/// Random forest averaging the class probabilities of its trees
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ForestParams", into = "ForestParams")]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    feature_importances: Array1<f64>,
    provided_importances: bool,
}

impl TryFrom<ForestParams> for RandomForest {
    type Error = LoanError;

    fn try_from(params: ForestParams) -> Result<Self> {
        Self::new(params.trees, params.n_features, params.feature_importances)
    }
}

impl From<RandomForest> for ForestParams {
    fn from(forest: RandomForest) -> Self {
        let feature_importances = forest
            .provided_importances
            .then(|| forest.feature_importances.to_vec());
        Self {
            n_features: forest.n_features,
            trees: forest.trees,
            feature_importances,
        }
    }
}

impl RandomForest {
    pub fn new(
        trees: Vec<DecisionTree>,
        n_features: usize,
        feature_importances: Option<Vec<f64>>,
    ) -> Result<Self> {
        if trees.is_empty() {
            return Err(LoanError::Serialization(
                "random forest has no trees".to_string(),
            ));
        }
        if let Some(tree) = trees.iter().find(|t| t.n_features() != n_features) {
            return Err(LoanError::Shape {
                expected: format!("trees fitted on {} features", n_features),
                actual: format!("tree fitted on {} features", tree.n_features()),
            });
        }

        let provided_importances = feature_importances.is_some();
        let feature_importances = resolve_importances(feature_importances, n_features, || {
            Self::mean_tree_importances(&trees, n_features)
        })?;

        Ok(Self {
            trees,
            n_features,
            feature_importances,
            provided_importances,
        })
    }

    fn mean_tree_importances(trees: &[DecisionTree], n_features: usize) -> Array1<f64> {
        let mut total = Array1::zeros(n_features);
        for imp in trees.iter().filter_map(|t| t.feature_importances()) {
            total += imp;
        }
        total /= trees.len() as f64;

        normalize_in_place(&mut total);
        total
    }

}

impl Classifier for RandomForest {
    fn model_type(&self) -> &'static str {
        "RandomForestClassifier"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        check_width(x, self.n_features)?;

        // Summed in tree order so repeated calls agree bit for bit
        let per_tree = self
            .trees
            .par_iter()
            .map(|tree| tree.predict_proba(x))
            .collect::<Result<Vec<_>>>()?;
        let summed = per_tree
            .into_iter()
            .fold(Array2::zeros((x.nrows(), N_CLASSES)), |acc, p| acc + p);

        Ok(summed / self.trees.len() as f64)
    }

    fn feature_importances(&self) -> Option<&Array1<f64>> {
        Some(&self.feature_importances)
    }
}
