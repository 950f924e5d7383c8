//! Artifact store
//!
//! Loads the four frozen artifacts produced by offline training from one
//! directory. Each component loads independently so a partially populated
//! directory still reports which pieces are present.

use crate::error::{LoanError, Result};
use crate::models::{Classifier, Model};
use crate::preprocessing::{EncoderSet, FeatureSchema, StandardScaler};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MODEL_FILE: &str = "loan_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const FEATURES_FILE: &str = "feature_columns.json";

/// Locations of the artifact files inside an artifact directory
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn scaler(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    pub fn encoders(&self) -> PathBuf {
        self.dir.join(ENCODERS_FILE)
    }

    pub fn features(&self) -> PathBuf {
        self.dir.join(FEATURES_FILE)
    }
}

/// Which artifacts loaded successfully
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentStatus {
    pub model: bool,
    pub scaler: bool,
    pub encoders: bool,
    pub features: bool,
}

impl ComponentStatus {
    pub fn all_loaded(&self) -> bool {
        self.model && self.scaler && self.encoders && self.features
    }
}

/// The frozen artifacts consumed at inference time
#[derive(Debug, Default)]
pub struct ArtifactStore {
    pub model: Option<Model>,
    pub scaler: Option<StandardScaler>,
    pub encoders: Option<EncoderSet>,
    pub features: Option<FeatureSchema>,
}

impl ArtifactStore {
    /// Load every artifact found in `dir`.
    ///
    /// Missing or invalid files are logged and left empty; this never fails.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let paths = ArtifactPaths::new(dir);
        info!(dir = %paths.dir().display(), "Loading model artifacts");

        let store = Self {
            model: load_component("model", &paths.model()),
            scaler: load_component("scaler", &paths.scaler()),
            encoders: load_component("encoders", &paths.encoders()),
            features: load_component("features", &paths.features()),
        };

        let status = store.status();
        if status.all_loaded() {
            info!(
                model_type = store.model.as_ref().map(|m| m.model_type()).unwrap_or_default(),
                "Model and preprocessors loaded"
            );
        } else {
            warn!(
                model = status.model,
                scaler = status.scaler,
                encoders = status.encoders,
                features = status.features,
                "Artifacts incomplete, serving without a model; run the training pipeline to produce them"
            );
        }

        store
    }

    pub fn status(&self) -> ComponentStatus {
        ComponentStatus {
            model: self.model.is_some(),
            scaler: self.scaler.is_some(),
            encoders: self.encoders.is_some(),
            features: self.features.is_some(),
        }
    }
}

fn load_component<T: DeserializeOwned>(component: &str, path: &Path) -> Option<T> {
    match read_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(component, path = %path.display(), error = %e, "Failed to load artifact");
            None
        }
    }
}

/// Read one JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| LoanError::Artifact {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| LoanError::Artifact {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
