use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    DocumentAction, DocumentUpload, ReviewRequest, ScheduleRequest, VerificationId,
    VerificationStatus, VisitRequest, YouthSearchFilters,
};
use super::repository::{DocumentRepository, VerificationRepository, VisitRepository};
use super::service::{VerificationError, VerificationService};
use crate::workflows::directory::domain::{UserId, YouthCategory};
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::repository::RepositoryError;

/// Router builder exposing the verification workflow endpoints.
pub fn verification_router<U, V, D, F>(service: Arc<VerificationService<U, V, D, F>>) -> Router
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/documents",
            get(documents_handler::<U, V, D, F>).post(upload_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/users/:user_id/verification",
            get(user_case_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/pending",
            get(pending_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/search",
            get(search_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/visits",
            post(record_visit_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/schedule",
            post(schedule_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/agents/:agent_id",
            get(worklist_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/:verification_id/review",
            put(review_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/:verification_id/assign",
            put(assign_handler::<U, V, D, F>),
        )
        .route(
            "/api/v1/verification/:verification_id/complete",
            put(complete_handler::<U, V, D, F>),
        )
        .with_state(service)
}

pub(crate) async fn upload_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Path(user_id): Path<String>,
    axum::Json(upload): axum::Json<DocumentUpload>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.upload_document(&UserId(user_id), upload) {
        Ok(stored) => {
            let status = match stored.action {
                DocumentAction::Created => StatusCode::CREATED,
                DocumentAction::Replaced => StatusCode::OK,
            };
            (status, axum::Json(stored)).into_response()
        }
        Err(error) => verification_error_response(error),
    }
}

pub(crate) async fn documents_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Path(user_id): Path<String>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.documents_for(&UserId(user_id)) {
        Ok(documents) => (StatusCode::OK, axum::Json(documents)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

pub(crate) async fn user_case_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Path(user_id): Path<String>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.case_for_user(&UserId(user_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

pub(crate) async fn pending_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.pending_cases() {
        Ok(cases) => (StatusCode::OK, axum::Json(cases)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

pub(crate) async fn review_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Path(verification_id): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.review(&VerificationId(verification_id), request) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignBody {
    field_agent_id: UserId,
}

pub(crate) async fn assign_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Path(verification_id): Path<String>,
    axum::Json(body): axum::Json<AssignBody>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.assign_agent(&VerificationId(verification_id), &body.field_agent_id) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

pub(crate) async fn worklist_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Path(agent_id): Path<String>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.agent_worklist(&UserId(agent_id)) {
        Ok(cases) => (StatusCode::OK, axum::Json(cases)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

pub(crate) async fn record_visit_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    axum::Json(request): axum::Json<VisitRequest>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.record_visit(request) {
        Ok(visit) => (StatusCode::CREATED, axum::Json(visit)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

pub(crate) async fn schedule_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    axum::Json(request): axum::Json<ScheduleRequest>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.schedule_visit(request) {
        Ok(scheduled) => (StatusCode::CREATED, axum::Json(scheduled)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteBody {
    field_agent_id: UserId,
    #[serde(default)]
    notes: Option<String>,
}

pub(crate) async fn complete_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Path(verification_id): Path<String>,
    axum::Json(body): axum::Json<CompleteBody>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    match service.complete(
        &VerificationId(verification_id),
        &body.field_agent_id,
        body.notes,
    ) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    camp: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

pub(crate) async fn search_handler<U, V, D, F>(
    State(service): State<Arc<VerificationService<U, V, D, F>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    let filters = YouthSearchFilters {
        category: params.category.as_deref().and_then(YouthCategory::parse),
        country: params.country,
        camp: params.camp,
        status: params.status.as_deref().and_then(VerificationStatus::parse),
    };

    match service.search_youth(filters) {
        Ok(hits) => (StatusCode::OK, axum::Json(hits)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

pub(crate) fn verification_error_response(error: VerificationError) -> Response {
    let status = match &error {
        VerificationError::CaseNotFound | VerificationError::UserNotFound => StatusCode::NOT_FOUND,
        VerificationError::NotAFieldAgent(_)
        | VerificationError::NotAnAdmin(_)
        | VerificationError::NoAgentAvailable
        | VerificationError::InvalidPhotoUrl(_)
        | VerificationError::Document(_) => StatusCode::UNPROCESSABLE_ENTITY,
        VerificationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        VerificationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        VerificationError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
