//! API Models

use churn_core::{DerivedFeatureSet, FeatureRow};
use churn_model::{ChurnLabel, ChurnModel, PredictionResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Engineered features
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DerivedSummary {
    /// New, Early, MidTerm or LongTerm
    pub tenure_group: String,
    pub recency_ratio: f64,
    pub is_active_user: bool,
    pub unhappy_customer: bool,
}

impl From<&DerivedFeatureSet> for DerivedSummary {
    fn from(features: &DerivedFeatureSet) -> Self {
        Self {
            tenure_group: features.tenure_group.to_string(),
            recency_ratio: features.recency_ratio,
            is_active_user: features.is_active_user,
            unhappy_customer: features.unhappy_customer,
        }
    }
}

/// Derived features and the model row they produce
#[derive(Debug, Serialize, ToSchema)]
pub struct FeaturesResponse {
    pub derived: DerivedSummary,
    /// The 22 named model columns, in training order
    #[schema(value_type = Object)]
    pub row: FeatureRow,
}

/// Churn prediction
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredictResponse {
    /// `Stay` or `Churn`
    pub label: String,
    /// `No Churn` or `Churn`
    pub label_text: String,
    /// Probability of churn in [0, 1]
    pub churn_probability: f64,
    /// Churn probability as a percentage, two decimals
    pub churn_percent: String,
    pub features: DerivedSummary,
}

impl PredictResponse {
    pub fn new(result: &PredictionResult, features: &DerivedFeatureSet) -> Self {
        Self {
            label: match result.label {
                ChurnLabel::Stay => "Stay".into(),
                ChurnLabel::Churn => "Churn".into(),
            },
            label_text: result.label.display().into(),
            churn_probability: result.churn_probability,
            churn_percent: format!("{:.2}", result.churn_percent()),
            features: features.into(),
        }
    }
}

/// Loaded model metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelSummary {
    pub name: String,
    pub estimator: String,
    pub encoded_width: Option<usize>,
    pub trained_at: Option<String>,
    /// Artifact path
    pub source: Option<String>,
    /// Name, estimator and input width
    pub description: String,
    pub loaded_at: String,
}

impl From<&ChurnModel> for ModelSummary {
    fn from(model: &ChurnModel) -> Self {
        let info = model.info();
        Self {
            name: info.name.clone(),
            estimator: info.estimator.clone(),
            encoded_width: info.encoded_width,
            trained_at: info.trained_at.clone(),
            source: info.source.clone(),
            description: model.describe(),
            loaded_at: info.loaded_at.to_rfc3339(),
        }
    }
}

/// Service health
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when prediction is unavailable
    pub status: String,
    pub model_loaded: bool,
    pub model: Option<ModelSummary>,
    /// Why prediction is unavailable
    pub notice: Option<String>,
    pub version: String,
    pub timestamp: String,
}
