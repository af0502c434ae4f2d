//! HTML form endpoints

use crate::error::WebError;
use crate::render::{self, Outcome, PageView};
use crate::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Router,
};
use churn_core::{derive, CustomerForm, CustomerRecord, DerivedFeatureSet};

/// Create form router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
}

fn render_page(
    state: &AppState,
    features: &DerivedFeatureSet,
    submitted: Option<&CustomerForm>,
    outcome: Outcome,
) -> Html<String> {
    let image_url = state.config.image_url();
    Html(render::page(&PageView {
        title: &state.config.page_title,
        image_url: &image_url,
        notice: state.notice(),
        features,
        submitted,
        outcome,
    }))
}

/// Empty form, or the degraded notice
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let features = derive(CustomerRecord::default());
    render_page(&state, &features, None, Outcome::Empty)
}

/// Submit the form and render the result
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<CustomerForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let defaults = derive(CustomerRecord::default());

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            let err = WebError::BadRequest(rejection.body_text());
            let page = render_page(&state, &defaults, None, Outcome::Error(err.user_message()));
            return (err.status(), page);
        }
    };

    let model = match state.model() {
        Ok(model) => model,
        Err(err) => return (err.status(), render_page(&state, &defaults, None, Outcome::Empty)),
    };

    let record = match form.collect() {
        Ok(record) => record,
        Err(e) => {
            let err = WebError::from(e);
            let outcome = Outcome::Error(err.user_message());
            return (err.status(), render_page(&state, &defaults, Some(&form), outcome));
        }
    };

    let features = derive(record);
    match model.predict(&features) {
        Ok(result) => {
            let page = render_page(&state, &features, None, Outcome::Prediction(result));
            (StatusCode::OK, page)
        }
        Err(e) => {
            tracing::error!("Inference failed: {}", e);
            let err = WebError::from(e);
            let outcome = Outcome::Error(err.user_message());
            (err.status(), render_page(&state, &features, None, outcome))
        }
    }
}
