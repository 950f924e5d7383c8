//! Prediction outputs

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Message returned with an approval
pub const APPROVED_MESSAGE: &str =
    "🎉 Congratulations! Your loan application shows strong indicators for approval.";

/// Message returned with a rejection
pub const REJECTED_MESSAGE: &str =
    "📋 Your application needs some improvements. Consider enhancing your credit history or income.";

/// Outcome of a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LoanStatus {
    Approved,
    Rejected,
}

impl LoanStatus {
    /// Map a predicted class (1 = approved) to a status.
    pub fn from_class(class: usize) -> Self {
        if class == 1 {
            LoanStatus::Approved
        } else {
            LoanStatus::Rejected
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LoanStatus::Approved => APPROVED_MESSAGE,
            LoanStatus::Rejected => REJECTED_MESSAGE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature importances ranked from most to least important.
///
/// Serializes as a JSON object whose keys keep the ranking order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    ranked: Vec<(String, f64)>,
}

impl FeatureImportance {
    /// Pair names with scores by position and sort descending (stable on ties).
    pub fn rank<'a>(names: impl IntoIterator<Item = &'a String>, scores: impl IntoIterator<Item = f64>) -> Self {
        let mut ranked: Vec<(String, f64)> = names.into_iter().cloned().zip(scores).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Self { ranked }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ranked.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ranked.len()))?;
        for (name, score) in &self.ranked {
            map.serialize_entry(name, score)?;
        }
        map.end()
    }
}

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PredictionResult {
    pub prediction: LoanStatus,
    /// Probability of the predicted class, rounded to 4 decimals
    pub confidence: f64,
    pub message: &'static str,
    pub input_data: Value,
    pub feature_importance: Option<FeatureImportance>,
}

/// Read-only description of the loaded model
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelDescription {
    pub model_type: &'static str,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<FeatureImportance>,
}

/// Round to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
