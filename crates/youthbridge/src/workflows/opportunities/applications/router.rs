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

use super::domain::{ApplicationId, ApplicationSubmission, StatusUpdate};
use super::eligibility::RefusalReason;
use super::repository::ApplicationRepository;
use super::service::{ApplicationError, ApplicationService};
use crate::workflows::directory::domain::UserId;
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::opportunities::domain::OpportunityId;
use crate::workflows::opportunities::repository::OpportunityRepository;
use crate::workflows::repository::RepositoryError;
use crate::workflows::verification::repository::{DocumentRepository, VerificationRepository};

/// Router builder exposing application intake and review endpoints.
pub fn application_router<A, O, V, U, D>(
    service: Arc<ApplicationService<A, O, V, U, D>>,
) -> Router
where
    A: ApplicationRepository + 'static,
    O: OpportunityRepository + 'static,
    V: VerificationRepository + 'static,
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_handler::<A, O, V, U, D>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler::<A, O, V, U, D>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            put(status_handler::<A, O, V, U, D>),
        )
        .route(
            "/api/v1/youths/:youth_id/applications",
            get(youth_applications_handler::<A, O, V, U, D>),
        )
        .route(
            "/api/v1/opportunities/:opportunity_id/applications",
            get(opportunity_applications_handler::<A, O, V, U, D>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<A, O, V, U, D>(
    State(service): State<Arc<ApplicationService<A, O, V, U, D>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OpportunityRepository + 'static,
    V: VerificationRepository + 'static,
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.submit(submission) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn youth_applications_handler<A, O, V, U, D>(
    State(service): State<Arc<ApplicationService<A, O, V, U, D>>>,
    Path(youth_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OpportunityRepository + 'static,
    V: VerificationRepository + 'static,
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.applications_for_youth(&UserId(youth_id)) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => application_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DonorParams {
    donor_id: String,
}

pub(crate) async fn opportunity_applications_handler<A, O, V, U, D>(
    State(service): State<Arc<ApplicationService<A, O, V, U, D>>>,
    Path(opportunity_id): Path<String>,
    Query(params): Query<DonorParams>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OpportunityRepository + 'static,
    V: VerificationRepository + 'static,
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.applications_for_opportunity(
        &OpportunityId(opportunity_id),
        &UserId(params.donor_id),
    ) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn status_handler<A, O, V, U, D>(
    State(service): State<Arc<ApplicationService<A, O, V, U, D>>>,
    Path(application_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OpportunityRepository + 'static,
    V: VerificationRepository + 'static,
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.update_status(
        &ApplicationId(application_id),
        &update.donor_id,
        update.status,
    ) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => application_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RequesterParams {
    requester_id: String,
}

pub(crate) async fn get_handler<A, O, V, U, D>(
    State(service): State<Arc<ApplicationService<A, O, V, U, D>>>,
    Path(application_id): Path<String>,
    Query(params): Query<RequesterParams>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OpportunityRepository + 'static,
    V: VerificationRepository + 'static,
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
{
    match service.get(&ApplicationId(application_id), &UserId(params.requester_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) fn application_error_response(error: ApplicationError) -> Response {
    let status = match &error {
        ApplicationError::OpportunityNotFound
        | ApplicationError::ApplicationNotFound
        | ApplicationError::YouthNotFound => StatusCode::NOT_FOUND,
        ApplicationError::NotOwner | ApplicationError::Forbidden => StatusCode::FORBIDDEN,
        ApplicationError::Refused(RefusalReason::AlreadyApplied) => StatusCode::CONFLICT,
        ApplicationError::Refused(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApplicationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
