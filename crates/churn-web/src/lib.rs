//! Churn Predictor Web Service
//!
//! HTML form and JSON API over the churn model.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        CHURN WEB                              │
//! │                                                               │
//! │   GET /            POST /predict        POST /api/v1/predict  │
//! │     │                   │                      │              │
//! │     ▼                   ▼                      ▼              │
//! │  ┌─────────┐      ┌───────────┐         ┌───────────┐         │
//! │  │ render  │◄─────│ collect   │────────►│  derive   │         │
//! │  └─────────┘      └───────────┘         └─────┬─────┘         │
//! │                                               ▼               │
//! │                                    ┌────────────────────┐     │
//! │                                    │ Arc<ChurnModel>    │     │
//! │                                    │ (loaded at startup)│     │
//! │                                    └────────────────────┘     │
//! └───────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod routes;

use axum::{routing::get, Json, Router};
use churn_model::{ChurnModel, LoadError};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use config::WebConfig;
pub use error::WebError;
pub use models::*;

/// Model availability, fixed at startup
#[derive(Clone, Debug)]
pub enum ModelState {
    /// Artifact loaded
    Ready(Arc<ChurnModel>),
    /// Artifact failed to load; the notice shown to users
    Unavailable(&'static str),
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded model or the reason it is missing
    pub model: ModelState,
    /// Service configuration
    pub config: Arc<WebConfig>,
}

impl AppState {
    /// State from a load attempt. A failure is logged here, once.
    pub fn new(config: WebConfig, loaded: Result<ChurnModel, LoadError>) -> Self {
        let model = match loaded {
            Ok(model) => ModelState::Ready(Arc::new(model)),
            Err(e) => {
                tracing::error!("Prediction disabled: {}", e);
                if e.is_not_found() {
                    ModelState::Unavailable(render::MODEL_NOT_FOUND)
                } else {
                    ModelState::Unavailable(render::MODEL_INVALID)
                }
            }
        };

        Self {
            model,
            config: Arc::new(config),
        }
    }

    /// Load the configured artifact
    pub fn load(config: WebConfig) -> Self {
        let loaded = churn_model::load_model(&config.model_path);
        Self::new(config, loaded)
    }

    /// The model, or the error every prediction request gets without one
    pub fn model(&self) -> Result<&Arc<ChurnModel>, WebError> {
        match &self.model {
            ModelState::Ready(model) => Ok(model),
            ModelState::Unavailable(notice) => Err(WebError::ModelUnavailable((*notice).into())),
        }
    }

    /// Degraded-state notice, if any
    pub fn notice(&self) -> Option<&'static str> {
        match &self.model {
            ModelState::Ready(_) => None,
            ModelState::Unavailable(notice) => Some(*notice),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Churn Predictor API",
        version = "0.1.0",
        description = "E-commerce customer churn prediction",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::api::predict,
        routes::api::features,
    ),
    components(
        schemas(
            ErrorResponse, DerivedSummary, FeaturesResponse,
            PredictResponse, ModelSummary, HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "prediction", description = "Churn prediction")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(routes::form::router())
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", routes::api::router())
        .nest_service("/static", static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
