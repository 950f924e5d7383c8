//! Input preprocessing module
//!
//! Turns loan application records into the feature rows the classifier was
//! trained on:
//! - Label encoding of categorical fields
//! - Feature schema alignment (ordering, missing and extra columns)
//! - Standard scaling with frozen parameters

mod encoder;
mod normalizer;
mod scaler;
mod schema;

pub use encoder::{EncoderSet, LabelEncoder};
pub use normalizer::{InputNormalizer, MISSING_COLUMN_VALUE, UNKNOWN_CATEGORY_CODE};
pub use scaler::StandardScaler;
pub use schema::{FeatureSchema, CATEGORICAL_FIELDS, REQUIRED_FIELDS};
