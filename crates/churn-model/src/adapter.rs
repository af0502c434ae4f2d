//! Inference Adapter
//!
//! Owns the loaded artifact for the lifetime of the process. Construct it once
//! at startup and share it by `Arc`; prediction never mutates it.

use crate::artifact::PipelineArtifact;
use crate::error::{InferenceError, InferenceResult, LoadError};
use crate::{ChurnLabel, ModelArtifact};
use chrono::{DateTime, Utc};
use churn_core::DerivedFeatureSet;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Artifact metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// Estimator kind
    pub estimator: String,
    /// Encoded input width, when known
    pub encoded_width: Option<usize>,
    /// Training timestamp from the artifact
    pub trained_at: Option<String>,
    /// Artifact path
    pub source: Option<String>,
    /// When the artifact was loaded
    pub loaded_at: DateTime<Utc>,
}

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Artifact's native decision
    pub label: ChurnLabel,
    /// Probability of the churn class, in [0, 1]
    pub churn_probability: f64,
}

impl PredictionResult {
    /// Churn probability as a percentage
    pub fn churn_percent(&self) -> f64 {
        self.churn_probability * 100.0
    }

    /// Probability of staying as a percentage
    pub fn stay_percent(&self) -> f64 {
        (1.0 - self.churn_probability) * 100.0
    }
}

/// Loaded churn model
pub struct ChurnModel {
    artifact: Box<dyn ModelArtifact>,
    info: ModelInfo,
}

impl std::fmt::Debug for ChurnModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChurnModel").field("info", &self.info).finish()
    }
}

/// Load the artifact at `path`. Called once per process.
pub fn load_model(path: impl AsRef<Path>) -> Result<ChurnModel, LoadError> {
    let path = path.as_ref();
    tracing::info!("Loading model artifact from {}", path.display());

    let start = Instant::now();
    let artifact = PipelineArtifact::read(path)?;
    let info = ModelInfo {
        name: artifact.name().to_string(),
        estimator: artifact.estimator_kind().to_string(),
        encoded_width: Some(artifact.encoded_width()),
        trained_at: artifact.trained_at().map(str::to_string),
        source: Some(path.display().to_string()),
        loaded_at: Utc::now(),
    };

    tracing::info!(
        source = info.source.as_deref().unwrap_or_default(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Model artifact loaded: {}",
        artifact.describe()
    );

    Ok(ChurnModel::new(artifact, info))
}

impl ChurnModel {
    /// Wrap an artifact
    pub fn new(artifact: impl ModelArtifact + 'static, info: ModelInfo) -> Self {
        Self {
            artifact: Box::new(artifact),
            info,
        }
    }

    /// Artifact metadata
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Artifact description
    pub fn describe(&self) -> String {
        self.artifact.describe()
    }

    /// Score one derived feature set
    pub fn predict(&self, features: &DerivedFeatureSet) -> InferenceResult<PredictionResult> {
        let rows = [features.to_row()];

        let label = self
            .artifact
            .classify(&rows)?
            .into_iter()
            .next()
            .ok_or(InferenceError::EmptyOutput)?;
        let [_, churn_probability] = self
            .artifact
            .score_probability(&rows)?
            .into_iter()
            .next()
            .ok_or(InferenceError::EmptyOutput)?;

        if !churn_probability.is_finite() {
            return Err(InferenceError::NonFinite("churn probability".into()));
        }
        if !(0.0..=1.0).contains(&churn_probability) {
            return Err(InferenceError::ProbabilityOutOfRange(churn_probability));
        }

        tracing::debug!(?label, churn_probability, "prediction");
        Ok(PredictionResult { label, churn_probability })
    }
}
