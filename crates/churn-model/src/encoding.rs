//! Column encoding
//!
//! Expands a [`FeatureRow`] into the dense numeric vector the estimator was
//! fitted on: standardised numerics and one-hot categoricals.

use crate::error::{InferenceError, InferenceResult, LoadError};
use churn_core::{ColumnKind, FeatureRow, FeatureValue, FEATURE_COLUMNS};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// How unseen categories are encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// All-zero block
    #[default]
    Ignore,
    /// Inference failure
    Error,
}

/// Encoding of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnEncoding {
    /// `(x - mean) / scale`; identity when both are omitted
    Numeric {
        #[serde(default)]
        mean: Option<f64>,
        #[serde(default)]
        scale: Option<f64>,
    },
    /// One indicator per training category
    OneHot {
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
}

impl ColumnEncoding {
    /// Number of encoded inputs this column produces
    pub fn width(&self) -> usize {
        match self {
            ColumnEncoding::Numeric { .. } => 1,
            ColumnEncoding::OneHot { categories, .. } => categories.len(),
        }
    }

    fn kind(&self) -> ColumnKind {
        match self {
            ColumnEncoding::Numeric { .. } => ColumnKind::Numeric,
            ColumnEncoding::OneHot { .. } => ColumnKind::Categorical,
        }
    }
}

/// Named column with its encoding, as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactColumn {
    /// Column name
    pub name: String,
    /// Encoding
    pub encoding: ColumnEncoding,
}

/// Validated row encoder
#[derive(Debug, Clone)]
pub struct RowEncoder {
    columns: Vec<ArtifactColumn>,
    width: usize,
}

impl RowEncoder {
    /// Check the artifact columns against the model row schema
    pub fn new(columns: Vec<ArtifactColumn>) -> Result<Self, LoadError> {
        if columns.len() != FEATURE_COLUMNS.len() {
            return Err(LoadError::Schema(format!(
                "artifact has {} columns, expected {}",
                columns.len(),
                FEATURE_COLUMNS.len()
            )));
        }

        for (i, (column, expected)) in columns.iter().zip(FEATURE_COLUMNS.iter()).enumerate() {
            if column.name != expected.name {
                return Err(LoadError::Schema(format!(
                    "column {} is {:?}, expected {:?}",
                    i, column.name, expected.name
                )));
            }
            if column.encoding.kind() != expected.kind {
                return Err(LoadError::Schema(format!(
                    "column {} has {:?} encoding, expected {:?}",
                    column.name,
                    column.encoding.kind(),
                    expected.kind
                )));
            }
            match &column.encoding {
                ColumnEncoding::Numeric { mean, scale } => {
                    if mean.is_some_and(|m| !m.is_finite()) {
                        return Err(LoadError::Invalid(format!("{}: mean is not finite", column.name)));
                    }
                    if scale.is_some_and(|s| !s.is_finite() || s == 0.0) {
                        return Err(LoadError::Invalid(format!("{}: scale must be finite and non-zero", column.name)));
                    }
                }
                ColumnEncoding::OneHot { categories, .. } => {
                    if categories.is_empty() {
                        return Err(LoadError::Invalid(format!("{}: no categories", column.name)));
                    }
                }
            }
        }

        let width = columns.iter().map(|c| c.encoding.width()).sum();
        Ok(Self { columns, width })
    }

    /// Number of encoded inputs
    pub fn width(&self) -> usize {
        self.width
    }

    /// Encode one row
    pub fn encode(&self, row: &FeatureRow) -> InferenceResult<Array1<f64>> {
        let values = row.values();
        if values.len() != self.columns.len() {
            return Err(InferenceError::RowWidth {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        let mut out = Array1::zeros(self.width);
        let mut offset = 0;

        for (column, value) in self.columns.iter().zip(values) {
            match (&column.encoding, value) {
                (ColumnEncoding::Numeric { mean, scale }, FeatureValue::Number(x)) => {
                    if !x.is_finite() {
                        return Err(InferenceError::NonFinite(column.name.clone()));
                    }
                    out[offset] = (x - mean.unwrap_or(0.0)) / scale.unwrap_or(1.0);
                }
                (ColumnEncoding::OneHot { categories, handle_unknown }, FeatureValue::Category(c)) => {
                    match categories.iter().position(|known| known == c) {
                        Some(i) => out[offset + i] = 1.0,
                        None if *handle_unknown == HandleUnknown::Ignore => {}
                        None => {
                            return Err(InferenceError::UnknownCategory {
                                column: column.name.clone(),
                                value: c.to_string(),
                            })
                        }
                    }
                }
                (ColumnEncoding::Numeric { .. }, FeatureValue::Category(_)) => {
                    return Err(InferenceError::ExpectedNumber(column.name.clone()));
                }
                (ColumnEncoding::OneHot { .. }, FeatureValue::Number(_)) => {
                    return Err(InferenceError::ExpectedCategory(column.name.clone()));
                }
            }
            offset += column.encoding.width();
        }

        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use churn_core::{derive, CustomerRecord};

    /// Encoding matching the schema: plain numerics, full one-hot vocabularies
    pub(crate) fn schema_columns(handle_unknown: HandleUnknown) -> Vec<ArtifactColumn> {
        FEATURE_COLUMNS
            .iter()
            .map(|c| ArtifactColumn {
                name: c.name.to_string(),
                encoding: match c.kind {
                    ColumnKind::Numeric => ColumnEncoding::Numeric { mean: None, scale: None },
                    ColumnKind::Categorical => ColumnEncoding::OneHot {
                        categories: vocabulary(c.name).iter().map(|s| s.to_string()).collect(),
                        handle_unknown,
                    },
                },
            })
            .collect()
    }

    fn vocabulary(column: &str) -> &'static [&'static str] {
        match column {
            "PreferredLoginDevice" => churn_core::LoginDevice::LABELS,
            "PreferredPaymentMode" => churn_core::PaymentMode::LABELS,
            "Gender" => churn_core::Gender::LABELS,
            "PreferedOrderCat" => churn_core::OrderCategory::LABELS,
            "MaritalStatus" => churn_core::MaritalStatus::LABELS,
            _ => &["New", "Early", "MidTerm", "LongTerm"],
        }
    }

    #[test]
    fn test_width_counts_one_hot_blocks() {
        let encoder = RowEncoder::new(schema_columns(HandleUnknown::Ignore)).unwrap();
        // 16 numeric + 2 + 5 + 2 + 5 + 3 + 4 indicators
        assert_eq!(encoder.width(), 37);
    }

    #[test]
    fn test_encode_default_customer() {
        let encoder = RowEncoder::new(schema_columns(HandleUnknown::Ignore)).unwrap();
        let x = encoder.encode(&derive(CustomerRecord::default()).to_row()).unwrap();

        assert_eq!(x[0], 12.0); // Tenure
        assert_eq!(x[1], 1.0); // PreferredLoginDevice = Mobile Phone
        assert_eq!(x[2], 0.0); // PreferredLoginDevice = Computer
        assert_eq!(x[3], 1.0); // CityTier
        // TenureGroup = MidTerm is the third of the last four indicators
        assert_eq!(x.slice(ndarray::s![33..]).to_vec(), vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_standardisation() {
        let mut columns = schema_columns(HandleUnknown::Ignore);
        columns[0].encoding = ColumnEncoding::Numeric { mean: Some(10.0), scale: Some(4.0) };
        let encoder = RowEncoder::new(columns).unwrap();
        let x = encoder.encode(&derive(CustomerRecord::default()).to_row()).unwrap();
        assert_eq!(x[0], 0.5);
    }

    #[test]
    fn test_unknown_category_handling() {
        let mut columns = schema_columns(HandleUnknown::Error);
        columns[21].encoding = ColumnEncoding::OneHot {
            categories: vec!["New".into(), "Early".into()],
            handle_unknown: HandleUnknown::Error,
        };
        let encoder = RowEncoder::new(columns.clone()).unwrap();
        let row = derive(CustomerRecord::default()).to_row();
        assert_eq!(
            encoder.encode(&row),
            Err(InferenceError::UnknownCategory {
                column: "TenureGroup".into(),
                value: "MidTerm".into(),
            })
        );

        if let ColumnEncoding::OneHot { handle_unknown, .. } = &mut columns[21].encoding {
            *handle_unknown = HandleUnknown::Ignore;
        }
        let encoder = RowEncoder::new(columns).unwrap();
        let x = encoder.encode(&row).unwrap();
        assert_eq!(x.slice(ndarray::s![33..]).sum(), 0.0);
    }

    #[test]
    fn test_schema_mismatch_is_rejected() {
        let mut columns = schema_columns(HandleUnknown::Ignore);
        columns.swap(0, 1);
        assert!(matches!(RowEncoder::new(columns), Err(LoadError::Schema(_))));

        let mut columns = schema_columns(HandleUnknown::Ignore);
        columns.pop();
        assert!(matches!(RowEncoder::new(columns), Err(LoadError::Schema(_))));

        let mut columns = schema_columns(HandleUnknown::Ignore);
        columns[1].encoding = ColumnEncoding::Numeric { mean: None, scale: None };
        assert!(matches!(RowEncoder::new(columns), Err(LoadError::Schema(_))));

        let mut columns = schema_columns(HandleUnknown::Ignore);
        columns[0].encoding = ColumnEncoding::Numeric { mean: None, scale: Some(0.0) };
        assert!(matches!(RowEncoder::new(columns), Err(LoadError::Invalid(_))));
    }
}
