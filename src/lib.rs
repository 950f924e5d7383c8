//! Loan Approval - loan application scoring service
//!
//! This crate serves predictions from a binary classifier fitted offline:
//! - Loading of frozen model and preprocessing artifacts
//! - Normalization of raw applications into model feature rows
//! - Prediction with confidence and feature importance ranking
//! - HTTP server and CLI interfaces
//!
//! # Modules
//!
//! ## Core
//! - [`artifacts`] - Artifact directory loading and component status
//! - [`preprocessing`] - Label encoding, schema alignment, standard scaling
//! - [`models`] - Logistic regression, decision tree and random forest classifiers
//! - [`inference`] - Validation, prediction and model description
//!
//! ## Services
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core modules
pub mod artifacts;
pub mod preprocessing;
pub mod models;
pub mod inference;

// Services
pub mod server;
pub mod cli;

pub use error::{LoanError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{LoanError, Result};

    // Artifacts
    pub use crate::artifacts::{ArtifactStore, ComponentStatus};

    // Preprocessing
    pub use crate::preprocessing::{EncoderSet, FeatureSchema, InputNormalizer, StandardScaler};

    // Models
    pub use crate::models::{Classifier, Model};

    // Inference
    pub use crate::inference::{FeatureImportance, InferenceService, LoanStatus, PredictionResult};
}
