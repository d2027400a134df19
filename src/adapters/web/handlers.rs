//! Request handlers for the web UI and its JSON API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    Form,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

use super::server::AppState;
use super::views::PageView;
use crate::domain::errors::PipelineError;
use crate::domain::models::{
    FormSelection, OutputView, ProjectLanguage, ProjectType, RunOutcome,
};

/// Error body returned by the JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Result of `POST /api/generate`.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub output: OutputView,
}

/// Selectable values, as accepted by the form and the API.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub project_types: Vec<&'static str>,
    pub languages: Vec<&'static str>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    render_page(&state, StatusCode::OK, &PageView::new(&FormSelection::default()))
}

/// Form submission: run the pipeline and re-render with the inputs kept
pub async fn generate_page(
    State(state): State<Arc<AppState>>,
    Form(form): Form<FormSelection>,
) -> Response {
    let page = PageView::new(&form);

    // Trigger disabled; nothing to run
    if !form.is_ready() {
        return render_page(&state, StatusCode::OK, &page);
    }

    match state.pipeline.generate(&form).await {
        Ok(outcome) => render_page(
            &state,
            StatusCode::OK,
            &page.with_output(OutputView::from_outcome(&outcome)),
        ),
        Err(PipelineError::Busy) => render_page(
            &state,
            StatusCode::CONFLICT,
            &page.with_notice("A generation is already running. Please wait for it to finish."),
        ),
        Err(PipelineError::Validation(e)) => render_page(
            &state,
            StatusCode::OK,
            &page.with_notice(e.to_string()),
        ),
        Err(e) => {
            error!("Pipeline aborted: {}", e);
            render_page(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &page.with_notice("Something went wrong. Please try again."),
            )
        }
    }
}

pub async fn generate_api(
    State(state): State<Arc<AppState>>,
    Json(form): Json<FormSelection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    match state.pipeline.generate(&form).await {
        Ok(outcome) => {
            let output = OutputView::from_outcome(&outcome);
            Ok(Json(GenerateResponse { outcome, output }))
        }
        Err(e) => Err(api_error(&e)),
    }
}

pub async fn list_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        project_types: ProjectType::ALL.into_iter().map(ProjectType::label).collect(),
        languages: ProjectLanguage::ALL
            .into_iter()
            .map(ProjectLanguage::label)
            .collect(),
    })
}

fn api_error(err: &PipelineError) -> ApiError {
    let (status, code) = match err {
        PipelineError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        PipelineError::Busy => (StatusCode::CONFLICT, "BUSY"),
        PipelineError::Template { .. }
        | PipelineError::Provider { .. }
        | PipelineError::InvalidTransition(_) => {
            error!("Pipeline aborted: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "PIPELINE_ERROR")
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
}

fn render_page(state: &AppState, status: StatusCode, page: &PageView) -> Response {
    match state.pages.render(page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            warn!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}
