//! Request handlers for the input form, the pipeline run, and report download.

use axum::Json;
use axum::extract::{Form, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::pipeline::{report_pdf_path, run_pipeline};
use crate::domain::REPORT_FILENAME;
use crate::error::AppError;
use crate::web::AppState;
use crate::web::pages::{input_page, result_page};

#[derive(Debug, Deserialize)]
pub struct CityForm {
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub report: Option<Uuid>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub async fn index() -> Html<String> {
    Html(input_page(None, ""))
}

// ---------------------------------------------------------------------------
// POST /
// ---------------------------------------------------------------------------

/// Run the pipeline for the submitted city and render the result.
///
/// The pipeline blocks (network, fit, file writes), so it runs on the
/// blocking pool. Any failure re-renders the form with the error message.
pub async fn predict(State(state): State<AppState>, Form(form): Form<CityForm>) -> Response {
    let city = form.city.unwrap_or_default().trim().to_string();
    let config = state.config.clone();
    let today = chrono::Local::now().date_naive();

    let city_for_run = city.clone();
    let joined =
        tokio::task::spawn_blocking(move || run_pipeline(&config, &city_for_run, today)).await;

    let result = match joined {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("pipeline task failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(input_page(Some("internal error"), &city)),
            )
                .into_response();
        }
    };

    match result {
        Ok(run) => {
            *state.latest_report.lock().await = Some(run.report_id);
            Html(result_page(
                &run.location.name,
                run.trained.accuracy,
                run.prediction.temperature,
                run.report_id,
            ))
            .into_response()
        }
        Err(err) => {
            tracing::warn!(city = %city, "request failed: {err}");
            (status_for(&err), Html(input_page(Some(&err.to_string()), &city))).into_response()
        }
    }
}

/// HTTP status for a failed run.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::LocationNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ---------------------------------------------------------------------------
// GET /download_pdf
// ---------------------------------------------------------------------------

/// Stream a generated report: the one named by `?report=`, else the latest.
pub async fn download_pdf(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let report_id = match query.report {
        Some(id) => Some(id),
        None => *state.latest_report.lock().await,
    };
    let Some(report_id) = report_id else {
        return (StatusCode::NOT_FOUND, "No report has been generated yet.").into_response();
    };

    let path = report_pdf_path(&state.config.artifact_dir, report_id);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{REPORT_FILENAME}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Report not found.").into_response()
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "failed to read report: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
