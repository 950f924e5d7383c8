//! Inference module
//!
//! Single-shot loan approval predictions:
//! - Required field validation
//! - Normalization through the frozen preprocessing pipeline
//! - Label, confidence and message derivation
//! - Feature importance ranking for models that expose it

mod engine;
mod result;

pub use engine::{InferenceService, PROCESSING_ERROR_MESSAGE};
pub use result::{
    round4, FeatureImportance, LoanStatus, ModelDescription, PredictionResult, APPROVED_MESSAGE,
    REJECTED_MESSAGE,
};
