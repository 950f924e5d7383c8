//! Categorical label encoding

use crate::error::{LoanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized form of a fitted label encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LabelEncoderParams {
    classes: Vec<String>,
}

/// Label encoder mapping known categories to their ordinal code.
///
/// The code of a category is its position in `classes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LabelEncoderParams", into = "LabelEncoderParams")]
pub struct LabelEncoder {
    classes: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl TryFrom<LabelEncoderParams> for LabelEncoder {
    type Error = LoanError;

    fn try_from(params: LabelEncoderParams) -> Result<Self> {
        Self::new(params.classes)
    }
}

impl From<LabelEncoder> for LabelEncoderParams {
    fn from(encoder: LabelEncoder) -> Self {
        Self { classes: encoder.classes }
    }
}

impl LabelEncoder {
    /// Create an encoder from the classes seen at fit time.
    pub fn new(classes: Vec<String>) -> Result<Self> {
        let mut mapping = HashMap::with_capacity(classes.len());
        for (idx, class) in classes.iter().enumerate() {
            if mapping.insert(class.clone(), idx).is_some() {
                return Err(LoanError::Serialization(format!(
                    "duplicate encoder class: {}",
                    class
                )));
            }
        }

        Ok(Self { classes, mapping })
    }

    /// Encode a category, or `None` if it was not seen at fit time.
    pub fn encode(&self, category: &str) -> Option<usize> {
        self.mapping.get(category).copied()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Frozen set of per-column label encoders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: HashMap<String, LabelEncoder>,
}

impl EncoderSet {
    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
