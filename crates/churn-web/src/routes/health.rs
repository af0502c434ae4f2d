//! Health check endpoint

use crate::models::{HealthResponse, ModelSummary};
use crate::{AppState, ModelState};
use axum::{extract::State, response::IntoResponse, Json};

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; `degraded` when prediction is unavailable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, model, notice) = match &state.model {
        ModelState::Ready(model) => ("healthy", Some(ModelSummary::from(model.as_ref())), None),
        ModelState::Unavailable(notice) => ("degraded", None, Some(notice.to_string())),
    };

    Json(HealthResponse {
        status: status.into(),
        model_loaded: model.is_some(),
        model,
        notice,
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use crate::models::HealthResponse;
    use crate::routes::fixtures;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_health_with_model() {
        let server = TestServer::new(build_router(fixtures::ready_state())).unwrap();

        let health: HealthResponse = server.get("/health").await.json();
        assert_eq!(health.status, "healthy");
        assert!(health.model_loaded);
        let model = health.model.unwrap();
        assert_eq!(model.name, "ecommerce-churn-logreg");
        assert_eq!(model.estimator, "logistic_regression");
        assert_eq!(model.encoded_width, Some(37));
        assert_eq!(model.source.as_deref(), Some(fixtures::SAMPLE_ARTIFACT));
        assert_eq!(model.description, "ecommerce-churn-logreg (logistic_regression, 37 inputs)");
    }

    #[tokio::test]
    async fn test_health_without_model() {
        let server = TestServer::new(build_router(fixtures::missing_state())).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();
        let health: HealthResponse = response.json();
        assert_eq!(health.status, "degraded");
        assert!(!health.model_loaded);
        assert!(health.model.is_none());
        assert!(health.notice.is_some());
    }
}
