use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{NewOpportunity, OpportunityFilters, OpportunityId, OpportunityUpdate};
use super::repository::OpportunityRepository;
use super::service::{OpportunityError, OpportunityService};
use crate::workflows::directory::domain::{UserId, YouthCategory};
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::repository::RepositoryError;

/// Router builder exposing the donor listing endpoints.
pub fn opportunity_router<O, U>(service: Arc<OpportunityService<O, U>>) -> Router
where
    O: OpportunityRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/opportunities",
            get(list_handler::<O, U>).post(create_handler::<O, U>),
        )
        .route(
            "/api/v1/opportunities/:opportunity_id",
            get(get_handler::<O, U>)
                .put(update_handler::<O, U>)
                .delete(delete_handler::<O, U>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<O, U>(
    State(service): State<Arc<OpportunityService<O, U>>>,
    axum::Json(new): axum::Json<NewOpportunity>,
) -> Response
where
    O: OpportunityRepository + 'static,
    U: UserRepository + 'static,
{
    match service.create(new) {
        Ok(opportunity) => (StatusCode::CREATED, axum::Json(opportunity)).into_response(),
        Err(error) => opportunity_error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    donor_id: Option<String>,
}

pub(crate) async fn list_handler<O, U>(
    State(service): State<Arc<OpportunityService<O, U>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    O: OpportunityRepository + 'static,
    U: UserRepository + 'static,
{
    let filters = OpportunityFilters {
        category: params.category.as_deref().and_then(YouthCategory::parse),
        country: params.country,
        active: params.active,
        donor_id: params.donor_id.map(UserId),
    };

    match service.list(filters) {
        Ok(listings) => (StatusCode::OK, axum::Json(listings)).into_response(),
        Err(error) => opportunity_error_response(error),
    }
}

pub(crate) async fn get_handler<O, U>(
    State(service): State<Arc<OpportunityService<O, U>>>,
    Path(opportunity_id): Path<String>,
) -> Response
where
    O: OpportunityRepository + 'static,
    U: UserRepository + 'static,
{
    match service.get(&OpportunityId(opportunity_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => opportunity_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBody {
    pub donor_id: UserId,
    #[serde(flatten)]
    pub update: OpportunityUpdate,
}

pub(crate) async fn update_handler<O, U>(
    State(service): State<Arc<OpportunityService<O, U>>>,
    Path(opportunity_id): Path<String>,
    axum::Json(body): axum::Json<UpdateBody>,
) -> Response
where
    O: OpportunityRepository + 'static,
    U: UserRepository + 'static,
{
    match service.update(&OpportunityId(opportunity_id), &body.donor_id, body.update) {
        Ok(opportunity) => (StatusCode::OK, axum::Json(opportunity)).into_response(),
        Err(error) => opportunity_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteParams {
    donor_id: String,
}

pub(crate) async fn delete_handler<O, U>(
    State(service): State<Arc<OpportunityService<O, U>>>,
    Path(opportunity_id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response
where
    O: OpportunityRepository + 'static,
    U: UserRepository + 'static,
{
    match service.delete(&OpportunityId(opportunity_id), &UserId(params.donor_id)) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "message": "opportunity deleted" })),
        )
            .into_response(),
        Err(error) => opportunity_error_response(error),
    }
}

pub(crate) fn opportunity_error_response(error: OpportunityError) -> Response {
    let status = match &error {
        OpportunityError::NotFound | OpportunityError::DonorNotFound => StatusCode::NOT_FOUND,
        OpportunityError::NotADonor(_)
        | OpportunityError::EmptyTitle
        | OpportunityError::EmptyDescription => StatusCode::UNPROCESSABLE_ENTITY,
        OpportunityError::NotOwner => StatusCode::FORBIDDEN,
        OpportunityError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        OpportunityError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        OpportunityError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
