//! Churn Model - Inference Adapter
//!
//! Loads the externally trained churn classifier once and scores derived
//! feature sets against it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        INFERENCE ADAPTER                                │
//! │                                                                         │
//! │   DerivedFeatureSet ──▶ FeatureRow (22 named columns)                   │
//! │                               │                                         │
//! │  ┌────────────────────────────▼──────────────────────────────────────┐ │
//! │  │                     MODEL ARTIFACT (read-only)                     │ │
//! │  │   RowEncoder: standardise | one-hot                                │ │
//! │  │   Estimator:  logistic regression | boosted trees | random forest  │ │
//! │  └────────────────────────────┬──────────────────────────────────────┘ │
//! │                               │                                         │
//! │          classify ──▶ label        score_probability ──▶ P(churn)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod adapter;
pub mod artifact;
pub mod encoding;
pub mod error;
pub mod estimator;

use churn_core::FeatureRow;
use serde::{Deserialize, Serialize};

pub use adapter::{load_model, ChurnModel, ModelInfo, PredictionResult};
pub use artifact::{ArtifactFile, PipelineArtifact, FORMAT_VERSION};
pub use error::{InferenceError, InferenceResult, LoadError};

/// Binary churn label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChurnLabel {
    /// Class 0
    Stay,
    /// Class 1
    Churn,
}

impl ChurnLabel {
    /// Label from a class index (1 = churn)
    pub fn from_class(class: usize) -> Self {
        if class == 1 {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Stay
        }
    }

    /// Human-readable label
    pub const fn display(&self) -> &'static str {
        match self {
            ChurnLabel::Stay => "No Churn",
            ChurnLabel::Churn => "Churn",
        }
    }
}

/// A trained classifier over model rows.
///
/// Implementations are immutable after construction and shared across
/// concurrent requests.
pub trait ModelArtifact: Send + Sync {
    /// Native class decision per row
    fn classify(&self, rows: &[FeatureRow]) -> InferenceResult<Vec<ChurnLabel>>;

    /// `[P(stay), P(churn)]` per row
    fn score_probability(&self, rows: &[FeatureRow]) -> InferenceResult<Vec<[f64; 2]>>;

    /// Short description for logs
    fn describe(&self) -> String {
        "model artifact".into()
    }
}
