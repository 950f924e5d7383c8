//! Inference service
//!
//! Owns the frozen normalizer and classifier. Every call is independent and
//! the service is never mutated after construction, so one instance is shared
//! across request handlers without locking.

use super::result::{round4, FeatureImportance, LoanStatus, ModelDescription, PredictionResult};
use crate::artifacts::ArtifactStore;
use crate::error::{LoanError, Result};
use crate::models::{predict_classes, Classifier, Model};
use crate::preprocessing::{EncoderSet, FeatureSchema, InputNormalizer, StandardScaler, REQUIRED_FIELDS};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Message returned when normalization fails
pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing input data";

/// Loan approval inference over frozen artifacts
#[derive(Debug)]
pub struct InferenceService {
    normalizer: InputNormalizer,
    model: Model,
    /// Ranked once at construction; `None` for models without importances
    importance: Option<FeatureImportance>,
}

impl InferenceService {
    /// Build the service, checking that all artifacts agree on the feature width.
    pub fn new(
        schema: FeatureSchema,
        encoders: EncoderSet,
        scaler: StandardScaler,
        model: Model,
    ) -> Result<Self> {
        if model.n_features() != schema.width() {
            return Err(LoanError::Shape {
                expected: format!("model fitted on {} features", schema.width()),
                actual: format!("model fitted on {} features", model.n_features()),
            });
        }

        let importance = model
            .feature_importances()
            .map(|scores| FeatureImportance::rank(schema.columns(), scores.iter().copied()));
        let normalizer = InputNormalizer::new(schema, encoders, scaler)?;

        Ok(Self {
            normalizer,
            model,
            importance,
        })
    }

    /// Build the service from a fully loaded artifact store.
    pub fn from_artifacts(store: ArtifactStore) -> Result<Self> {
        match store {
            ArtifactStore {
                model: Some(model),
                scaler: Some(scaler),
                encoders: Some(encoders),
                features: Some(features),
            } => Self::new(features, encoders, scaler, model),
            incomplete => {
                let status = incomplete.status();
                let missing: Vec<&str> = [
                    ("model", status.model),
                    ("scaler", status.scaler),
                    ("encoders", status.encoders),
                    ("features", status.features),
                ]
                .into_iter()
                .filter(|(_, loaded)| !loaded)
                .map(|(name, _)| name)
                .collect();
                Err(LoanError::Unavailable(format!(
                    "missing artifacts: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Check that the input is a non-empty object carrying every required field.
    pub fn validate(input: &Value) -> Result<&Map<String, Value>> {
        let record = match input.as_object() {
            Some(record) if !record.is_empty() => record,
            _ => return Err(LoanError::Validation("No data provided".to_string())),
        };

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !record.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(LoanError::missing_fields(&missing));
        }

        Ok(record)
    }

    /// Predict the outcome of one loan application.
    pub fn predict(&self, input: &Value) -> Result<PredictionResult> {
        let record = Self::validate(input)?;

        let x = self.normalizer.normalize(record).map_err(|e| {
            warn!(error = %e, "Failed to preprocess application");
            LoanError::Processing(PROCESSING_ERROR_MESSAGE.to_string())
        })?;

        let proba = self.model.predict_proba(&x)?;
        let class = predict_classes(&proba)
            .get(0)
            .copied()
            .ok_or_else(|| LoanError::Inference("classifier returned no prediction".to_string()))?;
        let confidence = proba
            .row(0)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !confidence.is_finite() {
            return Err(LoanError::Inference(format!(
                "classifier returned invalid probabilities: {}",
                proba.row(0)
            )));
        }

        let status = LoanStatus::from_class(class);
        info!(prediction = %status, confidence = %format!("{:.2}%", confidence * 100.0), "Prediction made");
        debug!(features = ?x.row(0).to_vec(), "Normalized feature row");

        Ok(PredictionResult {
            prediction: status,
            confidence: round4(confidence),
            message: status.message(),
            input_data: input.clone(),
            feature_importance: self.importance.clone(),
        })
    }

    /// Describe the loaded model.
    pub fn describe(&self) -> ModelDescription {
        ModelDescription {
            model_type: self.model.model_type(),
            features: self.normalizer.schema().columns().to_vec(),
            feature_importance: self.importance.clone(),
        }
    }

    pub fn feature_importance(&self) -> Option<&FeatureImportance> {
        self.importance.as_ref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.normalizer.schema()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}
