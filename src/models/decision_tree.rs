//! Decision tree classifier over flat node arrays

use super::{check_width, normalize_in_place, resolve_importances, Classifier, N_CLASSES};
use crate::error::{LoanError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Marker for "no child" in `children_left` / `children_right`
const LEAF: i64 = -1;

/// Serialized tree, in the node-array layout of the training library
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeParams {
    n_features: usize,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weighted_n_node_samples: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_importances: Option<Vec<f64>>,
}

/// Tree node
#[derive(Debug, Clone)]
enum TreeNode {
    /// Leaf node with class probabilities
    Leaf { proba: [f64; N_CLASSES] },
    /// Internal node; samples with x[feature] <= threshold go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Decision tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TreeParams", into = "TreeParams")]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
    feature_importances: Array1<f64>,
    /// Original artifact, kept so the tree serializes back unchanged
    params: TreeParams,
}

impl TryFrom<TreeParams> for DecisionTree {
    type Error = LoanError;

    fn try_from(params: TreeParams) -> Result<Self> {
        Self::from_params(params)
    }
}

impl From<DecisionTree> for TreeParams {
    fn from(tree: DecisionTree) -> Self {
        tree.params
    }
}

fn invalid(reason: String) -> LoanError {
    LoanError::Serialization(format!("invalid decision tree: {}", reason))
}

/// Gini impurity of a node from its class weights
fn gini(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - weights.iter().map(|w| (w / total).powi(2)).sum::<f64>()
}

impl DecisionTree {
    fn from_params(params: TreeParams) -> Result<Self> {
        let n_nodes = params.children_left.len();
        if n_nodes == 0 {
            return Err(invalid("tree has no nodes".to_string()));
        }
        if params.n_features == 0 {
            return Err(invalid("n_features must be positive".to_string()));
        }
        let lengths = [
            params.children_right.len(),
            params.feature.len(),
            params.threshold.len(),
            params.value.len(),
        ];
        if lengths.iter().any(|&len| len != n_nodes) {
            return Err(invalid(format!(
                "node arrays differ in length (expected {} nodes)",
                n_nodes
            )));
        }
        if let Some(ref weights) = params.weighted_n_node_samples {
            if weights.len() != n_nodes || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(invalid("weighted_n_node_samples is malformed".to_string()));
            }
        }

        let mut nodes = Vec::with_capacity(n_nodes);
        for i in 0..n_nodes {
            let value = &params.value[i];
            if value.len() != N_CLASSES || value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(invalid(format!(
                    "node {} must carry {} non-negative class weights",
                    i, N_CLASSES
                )));
            }

            let left = params.children_left[i];
            let right = params.children_right[i];
            if left == LEAF {
                let total: f64 = value.iter().sum();
                if total <= 0.0 {
                    return Err(invalid(format!("leaf {} has no weight", i)));
                }
                nodes.push(TreeNode::Leaf {
                    proba: [value[0] / total, value[1] / total],
                });
                continue;
            }

            let child_ok = |c: i64| c > i as i64 && (c as usize) < n_nodes;
            if !child_ok(left) || !child_ok(right) {
                return Err(invalid(format!("node {} has out-of-order children", i)));
            }
            let feature = params.feature[i];
            if feature < 0 || feature as usize >= params.n_features {
                return Err(invalid(format!(
                    "node {} splits on feature {} of {}",
                    i, feature, params.n_features
                )));
            }
            let threshold = params.threshold[i];
            if threshold.is_nan() {
                return Err(invalid(format!("node {} has a NaN threshold", i)));
            }

            nodes.push(TreeNode::Split {
                feature: feature as usize,
                threshold,
                left: left as usize,
                right: right as usize,
            });
        }

        let n_features = params.n_features;
        let feature_importances = resolve_importances(
            params.feature_importances.clone(),
            n_features,
            || Self::impurity_importances(&nodes, &params),
        )?;

        Ok(Self {
            nodes,
            n_features,
            feature_importances,
            params,
        })
    }

    /// Normalized mean decrease in Gini impurity per feature
    fn impurity_importances(nodes: &[TreeNode], params: &TreeParams) -> Array1<f64> {
        let weight = |i: usize| match params.weighted_n_node_samples {
            Some(ref w) => w[i],
            None => params.value[i].iter().sum::<f64>(),
        };
        let weighted_gini = |i: usize| weight(i) * gini(&params.value[i]);

        let mut importances = Array1::zeros(params.n_features);
        for (i, node) in nodes.iter().enumerate() {
            if let TreeNode::Split { feature, left, right, .. } = *node {
                let decrease = weighted_gini(i) - weighted_gini(left) - weighted_gini(right);
                importances[feature] += decrease.max(0.0);
            }
        }

        normalize_in_place(&mut importances);
        importances
    }

    /// Class probabilities for a single row.
    fn leaf_proba(&self, row: ArrayView1<f64>) -> [f64; N_CLASSES] {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { proba } => return proba,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

}

impl Classifier for DecisionTree {
    fn model_type(&self) -> &'static str {
        "DecisionTreeClassifier"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        check_width(x, self.n_features)?;

        let mut proba = Array2::zeros((x.nrows(), N_CLASSES));
        for (i, row) in x.rows().into_iter().enumerate() {
            let p = self.leaf_proba(row);
            proba[[i, 0]] = p[0];
            proba[[i, 1]] = p[1];
        }
        Ok(proba)
    }

    fn feature_importances(&self) -> Option<&Array1<f64>> {
        Some(&self.feature_importances)
    }
}
