//! Logistic regression

use super::{check_width, Classifier, N_CLASSES};
use crate::error::{LoanError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogisticParams {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Binary logistic regression: p(approved) = sigmoid(x . w + b)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LogisticParams", into = "LogisticParams")]
pub struct LogisticRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl TryFrom<LogisticParams> for LogisticRegression {
    type Error = LoanError;

    fn try_from(params: LogisticParams) -> Result<Self> {
        Self::new(params.coefficients, params.intercept)
    }
}

impl From<LogisticRegression> for LogisticParams {
    fn from(model: LogisticRegression) -> Self {
        Self {
            coefficients: model.coefficients.to_vec(),
            intercept: model.intercept,
        }
    }
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(LoanError::Serialization(
                "logistic regression has no coefficients".to_string(),
            ));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(LoanError::Serialization(
                "logistic regression parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            coefficients: Array1::from_vec(coefficients),
            intercept,
        })
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }
}

impl Classifier for LogisticRegression {
    fn model_type(&self) -> &'static str {
        "LogisticRegression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        check_width(x, self.n_features())?;

        let linear = x.dot(&self.coefficients) + self.intercept;
        let positive = Self::sigmoid(&linear);

        let mut proba = Array2::zeros((x.nrows(), N_CLASSES));
        for (i, &p) in positive.iter().enumerate() {
            proba[[i, 0]] = 1.0 - p;
            proba[[i, 1]] = p;
        }
        Ok(proba)
    }
}
