//! Application fields and the frozen feature schema

use crate::error::{LoanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fields every loan application must carry, in canonical order
pub const REQUIRED_FIELDS: [&str; 11] = [
    "Gender",
    "Married",
    "Dependents",
    "Education",
    "Self_Employed",
    "ApplicantIncome",
    "CoapplicantIncome",
    "LoanAmount",
    "Loan_Amount_Term",
    "Credit_History",
    "Property_Area",
];

/// Fields encoded with a label encoder before scaling
pub const CATEGORICAL_FIELDS: [&str; 6] = [
    "Gender",
    "Married",
    "Dependents",
    "Education",
    "Self_Employed",
    "Property_Area",
];

/// Ordered list of columns the scaler and classifier were fitted on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = LoanError;

    fn try_from(columns: Vec<String>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(LoanError::Serialization("feature schema is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(LoanError::Serialization(format!(
                "duplicate feature column: {}",
                dup
            )));
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}
