//! Request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::artifacts::ComponentStatus;
use crate::inference::{FeatureImportance, InferenceService, PredictionResult};

use super::error::{Result, ServerError};
use super::{state::AppState, VERSION};

const MODEL_DESCRIPTION: &str = "Balanced loan approval model designed for fair predictions";

pub async fn home(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Loan Approval Prediction API",
        "status": "running",
        "model_loaded": state.model_loaded(),
        "version": VERSION,
    }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    components: ComponentStatus,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.model_loaded(),
        components: state.components,
    })
}

#[derive(Serialize)]
pub struct ModelInfoResponse {
    model_type: Option<&'static str>,
    features: Option<Vec<String>>,
    model_loaded: bool,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature_importance: Option<FeatureImportance>,
}

pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    let response = match state.service() {
        Ok(service) => {
            let description = service.describe();
            ModelInfoResponse {
                model_type: Some(description.model_type),
                features: Some(description.features),
                model_loaded: true,
                description: MODEL_DESCRIPTION,
                feature_importance: description.feature_importance,
            }
        }
        Err(_) => ModelInfoResponse {
            model_type: None,
            features: None,
            model_loaded: false,
            description: MODEL_DESCRIPTION,
            feature_importance: None,
        },
    };
    Json(response)
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let Json(input) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ServerError::BadRequest(format!("Invalid JSON payload: {}", rejection.body_text()))
    })?;

    InferenceService::validate(&input)?;
    let service = state.service()?;
    let result = service.predict(&input)?;
    Ok(Json(result))
}
