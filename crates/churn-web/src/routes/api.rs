//! JSON prediction endpoints

use crate::error::WebError;
use crate::models::{ErrorResponse, FeaturesResponse, PredictResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use churn_core::{derive, CustomerForm};

/// Create API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route("/features", post(features))
}

fn parse(body: Result<Json<CustomerForm>, JsonRejection>) -> Result<CustomerForm, WebError> {
    body.map(|Json(form)| form)
        .map_err(|rejection| WebError::BadRequest(rejection.body_text()))
}

/// Predict churn for one customer
#[utoipa::path(
    post,
    path = "/api/v1/predict",
    responses(
        (status = 200, description = "Prediction", body = PredictResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse),
        (status = 503, description = "Model unavailable", body = ErrorResponse),
        (status = 500, description = "Inference failed", body = ErrorResponse)
    ),
    tag = "prediction"
)]
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<CustomerForm>, JsonRejection>,
) -> Result<Json<PredictResponse>, WebError> {
    let form = parse(body)?;
    let model = state.model()?;

    let features = derive(form.collect()?);
    let result = model.predict(&features)?;

    Ok(Json(PredictResponse::new(&result, &features)))
}

/// Derived features and model row, without prediction
#[utoipa::path(
    post,
    path = "/api/v1/features",
    responses(
        (status = 200, description = "Derived features", body = FeaturesResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    tag = "prediction"
)]
pub async fn features(
    body: Result<Json<CustomerForm>, JsonRejection>,
) -> Result<Json<FeaturesResponse>, WebError> {
    let features = derive(parse(body)?.collect()?);

    Ok(Json(FeaturesResponse {
        derived: (&features).into(),
        row: features.to_row(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use crate::models::{ErrorResponse, PredictResponse};
    use crate::routes::fixtures;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn test_predict_defaults() {
        let server = TestServer::new(build_router(fixtures::ready_state())).unwrap();

        let response = server.post("/api/v1/predict").json(&json!({})).await;
        response.assert_status_ok();
        let prediction: PredictResponse = response.json();
        assert_eq!(prediction.label, "Stay");
        assert_eq!(prediction.label_text, "No Churn");
        assert!((0.0..=1.0).contains(&prediction.churn_probability));
        assert_eq!(prediction.features.tenure_group, "MidTerm");
        assert!(prediction.features.is_active_user);
    }

    #[tokio::test]
    async fn test_predict_risky_customer() {
        let server = TestServer::new(build_router(fixtures::ready_state())).unwrap();

        let body = json!({
            "tenure": 1,
            "day_since_last_order": 40,
            "satisfaction_score": 2,
            "complain": true,
            "preferred_payment_mode": "Cash on Delivery"
        });
        let prediction: PredictResponse = server.post("/api/v1/predict").json(&body).await.json();
        assert_eq!(prediction.label, "Churn");
        assert!(prediction.churn_probability > 0.5);
        assert_eq!(
            prediction.churn_percent,
            format!("{:.2}", prediction.churn_probability * 100.0)
        );
        assert!(prediction.features.unhappy_customer);
        assert!(!prediction.features.is_active_user);
    }

    #[tokio::test]
    async fn test_predict_rejects_bad_city_tier() {
        let server = TestServer::new(build_router(fixtures::ready_state())).unwrap();

        let response = server.post("/api/v1/predict").json(&json!({"city_tier": 4})).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "invalid_input");
    }

    #[tokio::test]
    async fn test_predict_without_model_is_unavailable() {
        let server = TestServer::new(build_router(fixtures::missing_state())).unwrap();

        let response = server.post("/api/v1/predict").json(&json!({})).await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "model_unavailable");
    }

    #[tokio::test]
    async fn test_features_work_without_model() {
        let server = TestServer::new(build_router(fixtures::missing_state())).unwrap();

        let body = json!({"tenure": 12, "day_since_last_order": 10, "complain": "Yes"});
        let response = server.post("/api/v1/features").json(&body).await;
        response.assert_status_ok();
        let features: serde_json::Value = response.json();

        assert_eq!(features["derived"]["tenure_group"], "MidTerm");
        let ratio = features["derived"]["recency_ratio"].as_f64().unwrap();
        assert!((ratio - 10.0 / 13.0).abs() < 1e-12);

        let row = &features["row"];
        assert_eq!(row["Complain"], json!(1.0));
        assert_eq!(row["TenureGroup"], json!("MidTerm"));
        assert_eq!(row["RecencyRatio"].as_f64(), Some(10.0 / 13.0));
        assert_eq!(row.as_object().unwrap().len(), 22);
    }

    #[tokio::test]
    async fn test_malformed_json_is_unprocessable() {
        let server = TestServer::new(build_router(fixtures::ready_state())).unwrap();

        let response = server
            .post("/api/v1/predict")
            .json(&json!({"tenure": "twelve"}))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "bad_request");
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let server = TestServer::new(build_router(fixtures::ready_state())).unwrap();

        let doc: serde_json::Value = server.get("/api-docs/openapi.json").await.json();
        assert!(doc["paths"]["/api/v1/predict"].is_object());
        assert!(doc["paths"]["/health"].is_object());
    }
}
