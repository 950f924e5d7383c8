//! Frozen standard scaler

use crate::error::{LoanError, Result};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Serialized form of a fitted standard scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Standard scaling (z-score normalization): (x - mean) / scale
///
/// Parameters are fitted offline and never change once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ScalerParams", into = "ScalerParams")]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl TryFrom<ScalerParams> for StandardScaler {
    type Error = LoanError;

    fn try_from(params: ScalerParams) -> Result<Self> {
        Self::new(params.mean, params.scale)
    }
}

impl From<StandardScaler> for ScalerParams {
    fn from(scaler: StandardScaler) -> Self {
        Self {
            mean: scaler.mean.to_vec(),
            scale: scaler.scale.to_vec(),
        }
    }
}

impl StandardScaler {
    /// Create a scaler from fitted per-feature mean and scale.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(LoanError::Shape {
                expected: format!("scale length = {}", mean.len()),
                actual: format!("scale length = {}", scale.len()),
            });
        }
        if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(LoanError::Serialization(
                "scaler parameters must be finite".to_string(),
            ));
        }

        // Constant features were fitted with zero variance
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: Array1::from_vec(mean),
            scale: Array1::from_vec(scale),
        })
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Scale a single feature row.
    pub fn transform(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        if row.len() != self.n_features() {
            return Err(LoanError::Shape {
                expected: format!("{} features", self.n_features()),
                actual: format!("{} features", row.len()),
            });
        }

        Ok((&row - &self.mean) / &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standard_transform() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        let scaled = scaler.transform(array![3.0, 0.0].view()).unwrap();
        assert!((scaled[0] - 1.0).abs() < 1e-12);
        assert!((scaled[1] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::new(vec![4.0], vec![0.0]).unwrap();
        let scaled = scaler.transform(array![6.0].view()).unwrap();
        assert_eq!(scaled[0], 2.0);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        assert!(matches!(
            scaler.transform(array![1.0].view()),
            Err(LoanError::Shape { .. })
        ));
        assert!(StandardScaler::new(vec![0.0], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_deserialize_from_artifact() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{"mean": [0.5, 2.0], "scale": [0.5, 0.0]}"#).unwrap();
        assert_eq!(scaler.n_features(), 2);
        let scaled = scaler.transform(array![1.0, 3.0].view()).unwrap();
        assert_eq!(scaled.to_vec(), vec![1.0, 1.0]);
    }
}
