//! Error types for the loan approval service

use thiserror::Error;

/// Result type alias for loan approval operations
pub type Result<T> = std::result::Result<T, LoanError>;

/// Main error type for artifact loading, preprocessing and inference
#[derive(Error, Debug)]
pub enum LoanError {
    /// The application record is missing required fields or is empty.
    #[error("{0}")]
    Validation(String),

    /// The record could not be turned into a feature vector.
    #[error("Preprocessing error: {0}")]
    Processing(String),

    /// The artifacts needed to serve predictions are not loaded.
    #[error("Model not loaded: {0}")]
    Unavailable(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Artifact error in {path}: {reason}")]
    Artifact { path: String, reason: String },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LoanError {
    /// Build a validation error listing missing field names.
    pub fn missing_fields(fields: &[&str]) -> Self {
        LoanError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }
}

impl From<ndarray::ShapeError> for LoanError {
    fn from(err: ndarray::ShapeError) -> Self {
        LoanError::Shape {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
