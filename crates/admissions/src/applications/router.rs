use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, CategoryFilter};
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{AdmissionService, AdmissionServiceError};
use super::views::RankingEntry;

/// Router builder exposing the ranking, export, form and audit endpoints.
pub fn admission_router<R>(service: Arc<AdmissionService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/applications", get(ranking_handler::<R>))
        .route(
            "/api/v1/applications/:application_id",
            get(detail_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/form",
            get(form_handler::<R>),
        )
        .route("/api/v1/exports/:category", get(export_handler::<R>))
        .route("/api/v1/summary", get(summary_handler::<R>))
        .route("/api/v1/audit", get(audit_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankingQuery {
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FormQuery {
    format: Option<String>,
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Query(query): Query<RankingQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let filter = match query.category.as_deref() {
        None => CategoryFilter::default(),
        Some(raw) => match raw.parse::<CategoryFilter>() {
            Ok(filter) => filter,
            Err(error) => return bad_request(error.to_string()),
        },
    };

    match service.ranking(filter).await {
        Ok(ranked) => {
            let entries: Vec<RankingEntry> = ranked.iter().map(RankingEntry::from).collect();
            let payload = json!({
                "category": filter.slug(),
                "count": entries.len(),
                "applications": entries,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => service_error(other),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.detail(&id).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(other) => service_error(other),
    }
}

pub(crate) async fn form_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(application_id): Path<String>,
    Query(query): Query<FormQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    let form = match service.admission_form(&id, Utc::now().date_naive()).await {
        Ok(form) => form,
        Err(other) => return service_error(other),
    };

    match query.format.as_deref() {
        None | Some("json") => (StatusCode::OK, axum::Json(form)).into_response(),
        Some("text") => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, attachment(&form.filename)),
            ],
            form.render_text(),
        )
            .into_response(),
        Some(other) => bad_request(format!("unsupported form format '{other}'")),
    }
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
    Path(category): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let filter = match category.parse::<CategoryFilter>() {
        Ok(filter) => filter,
        Err(error) => return bad_request(error.to_string()),
    };

    match service.export(filter, Utc::now().date_naive()).await {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, attachment(&export.filename)),
            ],
            export.content,
        )
            .into_response(),
        Err(other) => service_error(other),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<AdmissionService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.summary().await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(other) => service_error(other),
    }
}

pub(crate) async fn audit_handler<R>(State(service): State<Arc<AdmissionService<R>>>) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.audit().await {
        Ok(audit) => (StatusCode::OK, axum::Json(audit)).into_response(),
        Err(other) => service_error(other),
    }
}

fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', ""))
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn service_error(error: AdmissionServiceError) -> Response {
    let status = match &error {
        AdmissionServiceError::NotFound(_) | AdmissionServiceError::NothingToExport(_) => {
            StatusCode::NOT_FOUND
        }
        AdmissionServiceError::Repository(
            RepositoryError::Transport(_) | RepositoryError::InvalidDocument { .. },
        ) => StatusCode::BAD_GATEWAY,
        AdmissionServiceError::Repository(RepositoryError::Unavailable(_))
        | AdmissionServiceError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %error, "admission request failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
