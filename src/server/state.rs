//! Application state management

use std::path::PathBuf;
use tracing::{error, info};

use crate::artifacts::{ArtifactStore, ComponentStatus};
use crate::inference::InferenceService;

use super::error::{Result, ServerError};

/// Application state shared across handlers.
///
/// Built once at startup and never mutated, so handlers share it through an
/// `Arc` without locks.
pub struct AppState {
    pub components: ComponentStatus,
    service: Option<InferenceService>,
}

impl AppState {
    /// Build state from whatever artifacts loaded.
    pub fn new(store: ArtifactStore) -> Self {
        let components = store.status();
        let service = match InferenceService::from_artifacts(store) {
            Ok(service) => {
                info!(
                    model_type = service.describe().model_type,
                    n_features = service.schema().width(),
                    "Inference service ready"
                );
                Some(service)
            }
            Err(e) => {
                error!(error = %e, "Inference service unavailable");
                None
            }
        };

        Self { components, service }
    }

    /// Load artifacts from a model directory.
    pub fn load(model_dir: impl Into<PathBuf>) -> Self {
        Self::new(ArtifactStore::load(model_dir))
    }

    /// State around an already constructed service.
    pub fn with_service(service: InferenceService) -> Self {
        Self {
            components: ComponentStatus {
                model: true,
                scaler: true,
                encoders: true,
                features: true,
            },
            service: Some(service),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.service.is_some()
    }

    /// The inference service, or an unavailable error when artifacts are missing.
    pub fn service(&self) -> Result<&InferenceService> {
        self.service
            .as_ref()
            .ok_or_else(|| ServerError::Unavailable("inference service not initialised".to_string()))
    }
}
