//! JSON model artifact
//!
//! The trained pipeline exported as a single JSON document: per-column
//! encodings followed by one estimator.

use crate::encoding::{ArtifactColumn, RowEncoder};
use crate::error::{InferenceResult, LoadError};
use crate::estimator::{Estimator, EstimatorSpec};
use crate::{ChurnLabel, ModelArtifact};
use churn_core::FeatureRow;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Newest artifact format this build reads
pub const FORMAT_VERSION: u32 = 1;

/// Artifact document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// Format version
    pub format_version: u32,
    /// Model name
    #[serde(default)]
    pub name: Option<String>,
    /// Training timestamp, free-form
    #[serde(default)]
    pub trained_at: Option<String>,
    /// Input columns in training order
    pub columns: Vec<ArtifactColumn>,
    /// Classifier
    pub estimator: EstimatorSpec,
}

/// Loaded encoder + estimator pipeline
#[derive(Debug, Clone)]
pub struct PipelineArtifact {
    name: String,
    trained_at: Option<String>,
    encoder: RowEncoder,
    estimator: Estimator,
}

impl PipelineArtifact {
    /// Validate a parsed artifact document
    pub fn from_file(file: ArtifactFile) -> Result<Self, LoadError> {
        if file.format_version == 0 || file.format_version > FORMAT_VERSION {
            return Err(LoadError::UnsupportedVersion(file.format_version));
        }

        let encoder = RowEncoder::new(file.columns)?;
        let estimator = Estimator::from_spec(file.estimator, encoder.width())?;

        Ok(Self {
            name: file.name.unwrap_or_else(|| "unnamed".into()),
            trained_at: file.trained_at,
            encoder,
            estimator,
        })
    }

    /// Parse and validate artifact JSON
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let file: ArtifactFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Read, parse and validate an artifact file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Training timestamp
    pub fn trained_at(&self) -> Option<&str> {
        self.trained_at.as_deref()
    }

    /// Estimator kind
    pub fn estimator_kind(&self) -> &'static str {
        self.estimator.kind()
    }

    /// Encoded input width
    pub fn encoded_width(&self) -> usize {
        self.encoder.width()
    }
}

impl ModelArtifact for PipelineArtifact {
    fn classify(&self, rows: &[FeatureRow]) -> InferenceResult<Vec<ChurnLabel>> {
        rows.iter()
            .map(|row| {
                let x = self.encoder.encode(row)?;
                Ok(ChurnLabel::from_class(self.estimator.predict(x.view())))
            })
            .collect()
    }

    fn score_probability(&self, rows: &[FeatureRow]) -> InferenceResult<Vec<[f64; 2]>> {
        rows.iter()
            .map(|row| {
                let x = self.encoder.encode(row)?;
                Ok(self.estimator.predict_proba(x.view()))
            })
            .collect()
    }

    fn describe(&self) -> String {
        format!("{} ({}, {} inputs)", self.name, self.estimator.kind(), self.encoder.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{tests::schema_columns, HandleUnknown};
    use churn_core::{derive, CustomerRecord};

    fn logistic_file(coefficients: Vec<f64>) -> ArtifactFile {
        ArtifactFile {
            format_version: 1,
            name: Some("test".into()),
            trained_at: None,
            columns: schema_columns(HandleUnknown::Ignore),
            estimator: EstimatorSpec::LogisticRegression { coefficients, intercept: 0.0 },
        }
    }

    #[test]
    fn test_pipeline_scores_rows() {
        // Only DaySinceLastOrder (encoded index 28) carries weight
        let mut coefficients = vec![0.0; 37];
        coefficients[28] = 0.1;
        let artifact = PipelineArtifact::from_file(logistic_file(coefficients)).unwrap();

        let recent = derive(CustomerRecord { day_since_last_order: 0, ..Default::default() }).to_row();
        let stale = derive(CustomerRecord { day_since_last_order: 40, ..Default::default() }).to_row();

        let labels = artifact.classify(&[recent.clone(), stale.clone()]).unwrap();
        assert_eq!(labels, vec![ChurnLabel::Stay, ChurnLabel::Churn]);

        let probs = artifact.score_probability(&[recent, stale]).unwrap();
        assert_eq!(probs[0], [0.5, 0.5]);
        assert!(probs[1][1] > 0.98);
        assert!((probs[1][0] + probs[1][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_version_and_width_checks() {
        let mut file = logistic_file(vec![0.0; 37]);
        file.format_version = 2;
        assert!(matches!(PipelineArtifact::from_file(file), Err(LoadError::UnsupportedVersion(2))));

        let file = logistic_file(vec![0.0; 36]);
        assert!(matches!(PipelineArtifact::from_file(file), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn test_corrupt_json() {
        assert!(matches!(PipelineArtifact::from_json("{not json"), Err(LoadError::Parse(_))));
        assert!(matches!(
            PipelineArtifact::from_json(r#"{"format_version": 1, "columns": []}"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineArtifact::read("/nonexistent/final_model.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_json_round_trip_of_document() {
        let file = logistic_file(vec![0.25; 37]);
        let json = serde_json::to_string(&file).unwrap();
        let artifact = PipelineArtifact::from_json(&json).unwrap();
        assert_eq!(artifact.name(), "test");
        assert_eq!(artifact.estimator_kind(), "logistic_regression");
        assert_eq!(artifact.encoded_width(), 37);
    }
}
