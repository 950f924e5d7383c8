//! Application record to feature vector alignment

use super::encoder::EncoderSet;
use super::scaler::StandardScaler;
use super::schema::{FeatureSchema, CATEGORICAL_FIELDS};
use crate::error::{LoanError, Result};
use ndarray::{Array1, Array2};
use serde_json::{Map, Value};

/// Code used for categories the encoder never saw at fit time
pub const UNKNOWN_CATEGORY_CODE: f64 = 0.0;

/// Value used for schema columns absent from the record
pub const MISSING_COLUMN_VALUE: f64 = 0.0;

/// Turns a raw application record into the scaled row the classifier expects.
///
/// Categorical fields known to the encoder set are label-encoded, with unseen
/// categories mapped to [`UNKNOWN_CATEGORY_CODE`]. Schema columns missing from
/// the record take [`MISSING_COLUMN_VALUE`], fields outside the schema are
/// ignored, and the row is laid out in schema order before scaling.
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    schema: FeatureSchema,
    encoders: EncoderSet,
    scaler: StandardScaler,
}

impl InputNormalizer {
    pub fn new(schema: FeatureSchema, encoders: EncoderSet, scaler: StandardScaler) -> Result<Self> {
        if schema.width() != scaler.n_features() {
            return Err(LoanError::Shape {
                expected: format!("scaler fitted on {} features", schema.width()),
                actual: format!("scaler fitted on {} features", scaler.n_features()),
            });
        }

        Ok(Self {
            schema,
            encoders,
            scaler,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Encode and align a record without scaling it.
    pub fn align(&self, record: &Map<String, Value>) -> Result<Array1<f64>> {
        let row = self
            .schema
            .columns()
            .iter()
            .map(|column| match record.get(column) {
                None => Ok(MISSING_COLUMN_VALUE),
                Some(value) => self.encode_cell(column, value),
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array1::from_vec(row))
    }

    /// Encode, align and scale a record into a single-row matrix.
    pub fn normalize(&self, record: &Map<String, Value>) -> Result<Array2<f64>> {
        let aligned = self.align(record)?;
        let scaled = self.scaler.transform(aligned.view())?;
        let width = scaled.len();

        Ok(scaled.into_shape_with_order((1, width))?)
    }

    fn encode_cell(&self, column: &str, value: &Value) -> Result<f64> {
        if CATEGORICAL_FIELDS.contains(&column) {
            if let Some(encoder) = self.encoders.get(column) {
                let category = category_text(column, value)?;
                let code = encoder
                    .encode(&category)
                    .map(|c| c as f64)
                    .unwrap_or(UNKNOWN_CATEGORY_CODE);
                return Ok(code);
            }
        }

        numeric_value(column, value)
    }
}

fn category_text(column: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(number_text(n)),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(LoanError::Processing(format!(
            "{} must be a category, got {}",
            column, value
        ))),
    }
}

/// Integral floats print without a fraction so `2.0` matches the class "2".
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn numeric_value(column: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoanError::Processing(format!("{} must be numeric, got {}", column, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalizer() -> InputNormalizer {
        let schema = FeatureSchema::new(vec![
            "Gender".to_string(),
            "ApplicantIncome".to_string(),
            "Property_Area".to_string(),
            "Dependents".to_string(),
        ])
        .unwrap();
        let encoders: EncoderSet = serde_json::from_value(json!({
            "Gender": {"classes": ["Female", "Male"]},
            "Property_Area": {"classes": ["Rural", "Semiurban", "Urban"]},
            "Dependents": {"classes": ["0", "1", "2", "3+"]},
        }))
        .unwrap();
        let scaler = StandardScaler::new(vec![0.0, 1000.0, 0.0, 0.0], vec![1.0, 500.0, 1.0, 1.0]).unwrap();
        InputNormalizer::new(schema, encoders, scaler).unwrap()
    }

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_align_follows_schema_order() {
        let row = normalizer()
            .align(&record(json!({
                "Property_Area": "Urban",
                "Dependents": "3+",
                "ApplicantIncome": 2500,
                "Gender": "Male",
            })))
            .unwrap();
        assert_eq!(row.to_vec(), vec![1.0, 2500.0, 2.0, 3.0]);
    }

    #[test]
    fn test_unknown_category_falls_back_to_zero() {
        let row = normalizer()
            .align(&record(json!({
                "Gender": "Male",
                "ApplicantIncome": 1000,
                "Property_Area": "Moon",
                "Dependents": "1",
            })))
            .unwrap();
        assert_eq!(row[2], UNKNOWN_CATEGORY_CODE);
    }

    #[test]
    fn test_missing_and_extra_columns() {
        let row = normalizer()
            .align(&record(json!({"Gender": "Female", "Loan_ID": "LP000001"})))
            .unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(row.to_vec(), vec![0.0, MISSING_COLUMN_VALUE, MISSING_COLUMN_VALUE, MISSING_COLUMN_VALUE]);
    }

    #[test]
    fn test_numeric_category_matches_text_class() {
        let row = normalizer()
            .align(&record(json!({"Dependents": 2})))
            .unwrap();
        assert_eq!(row[3], 2.0);
    }

    #[test]
    fn test_integral_float_category_matches_text_class() {
        let n = normalizer();
        assert_eq!(n.align(&record(json!({"Dependents": 2.0}))).unwrap()[3], 2.0);
        assert_eq!(n.align(&record(json!({"Dependents": 1.0}))).unwrap()[3], 1.0);
        assert_eq!(n.align(&record(json!({"Dependents": 1.5}))).unwrap()[3], UNKNOWN_CATEGORY_CODE);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let row = normalizer()
            .align(&record(json!({"ApplicantIncome": " 5849 "})))
            .unwrap();
        assert_eq!(row[1], 5849.0);
    }

    #[test]
    fn test_invalid_cells_fail_whole_record() {
        let n = normalizer();
        let bad_numeric = n.normalize(&record(json!({"ApplicantIncome": "lots"})));
        assert!(matches!(bad_numeric, Err(LoanError::Processing(_))));

        let null_category = n.normalize(&record(json!({"Gender": null})));
        assert!(matches!(null_category, Err(LoanError::Processing(_))));

        let nested = n.normalize(&record(json!({"ApplicantIncome": [1, 2]})));
        assert!(matches!(nested, Err(LoanError::Processing(_))));
    }

    #[test]
    fn test_normalize_scales_single_row() {
        let x = normalizer()
            .normalize(&record(json!({
                "Gender": "Male",
                "ApplicantIncome": 2000,
                "Property_Area": "Rural",
                "Dependents": "0",
            })))
            .unwrap();
        assert_eq!(x.shape(), &[1, 4]);
        assert!((x[[0, 1]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_schema_scaler_mismatch_rejected() {
        let schema = FeatureSchema::new(vec!["Gender".to_string()]).unwrap();
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        assert!(InputNormalizer::new(schema, EncoderSet::default(), scaler).is_err());
    }
}
