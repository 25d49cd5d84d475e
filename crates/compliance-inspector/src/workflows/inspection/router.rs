use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::InspectionRecord;
use super::report::CancellationFlag;
use super::repository::{InspectionRepository, ReportMailer};
use super::service::{ReportFormat, ReportServiceError, ViolationReportService};

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default = "default_format")]
    pub(crate) format: ReportFormat,
}

fn default_format() -> ReportFormat {
    ReportFormat::Html
}

/// Router builder exposing record intake and report endpoints.
pub fn inspection_router<R, M>(service: Arc<ViolationReportService<R, M>>) -> Router
where
    R: InspectionRepository + 'static,
    M: ReportMailer + 'static,
{
    Router::new()
        .route("/api/v1/inspections", post(submit_handler::<R, M>))
        .route(
            "/api/v1/inspections/violations",
            get(violations_handler::<R, M>),
        )
        .route("/api/v1/inspections/report", get(report_handler::<R, M>))
        .route(
            "/api/v1/inspections/report/document",
            get(document_handler::<R, M>),
        )
        .route(
            "/api/v1/inspections/report/email",
            post(email_handler::<R, M>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, M>(
    State(service): State<Arc<ViolationReportService<R, M>>>,
    Json(record): Json<InspectionRecord>,
) -> Response
where
    R: InspectionRepository + 'static,
    M: ReportMailer + 'static,
{
    match service.submit(record) {
        Ok(()) => (StatusCode::CREATED, Json(json!({ "status": "stored" }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn violations_handler<R, M>(
    State(service): State<Arc<ViolationReportService<R, M>>>,
) -> Response
where
    R: InspectionRepository + 'static,
    M: ReportMailer + 'static,
{
    match service.overview() {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R, M>(
    State(service): State<Arc<ViolationReportService<R, M>>>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    R: InspectionRepository + 'static,
    M: ReportMailer + 'static,
{
    match service.render(query.format, Utc::now()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, query.format.mime().to_string())],
            body,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn document_handler<R, M>(
    State(service): State<Arc<ViolationReportService<R, M>>>,
) -> Response
where
    R: InspectionRepository + 'static,
    M: ReportMailer + 'static,
{
    match service.download_document(Utc::now(), &CancellationFlag::new()) {
        Ok(artifact) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name),
                ),
            ],
            artifact.bytes,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn email_handler<R, M>(
    State(service): State<Arc<ViolationReportService<R, M>>>,
) -> Response
where
    R: InspectionRepository + 'static,
    M: ReportMailer + 'static,
{
    match service.email_report(Utc::now()) {
        Ok(receipt) => (StatusCode::ACCEPTED, Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

impl ReportServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoRecipients => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(_) | Self::Mailer(_) => StatusCode::BAD_GATEWAY,
            Self::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Packaging(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn error_response(err: ReportServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (err.status_code(), Json(payload)).into_response()
}
