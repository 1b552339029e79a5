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

use super::domain::{NewUser, ProfileUpdate, SortOrder, UserId, UserListQuery, UserRole, UserSortKey};
use super::service::{DirectoryError, DirectoryService};
use crate::workflows::repository::RepositoryError;
use crate::workflows::verification::repository::VerificationRepository;
use super::repository::UserRepository;

/// Router builder exposing registration, profiles, and the admin listing.
pub fn directory_router<U, V>(service: Arc<DirectoryService<U, V>>) -> Router
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users",
            get(list_users_handler::<U, V>).post(register_handler::<U, V>),
        )
        .route(
            "/api/v1/users/:user_id",
            get(profile_handler::<U, V>).put(update_profile_handler::<U, V>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserListParams {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    order: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl UserListParams {
    fn into_query(self) -> UserListQuery {
        UserListQuery {
            page: self.page,
            limit: self.limit,
            sort: self
                .sort
                .as_deref()
                .and_then(UserSortKey::parse)
                .unwrap_or_default(),
            order: self
                .order
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or_default(),
            role: self.role.as_deref().and_then(UserRole::parse),
        }
    }
}

pub(crate) async fn register_handler<U, V>(
    State(service): State<Arc<DirectoryService<U, V>>>,
    axum::Json(new_user): axum::Json<NewUser>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.register(new_user) {
        Ok(registered) => (StatusCode::CREATED, axum::Json(registered)).into_response(),
        Err(error) => directory_error_response(error),
    }
}

pub(crate) async fn profile_handler<U, V>(
    State(service): State<Arc<DirectoryService<U, V>>>,
    Path(user_id): Path<String>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.profile(&UserId(user_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => directory_error_response(error),
    }
}

pub(crate) async fn update_profile_handler<U, V>(
    State(service): State<Arc<DirectoryService<U, V>>>,
    Path(user_id): Path<String>,
    axum::Json(update): axum::Json<ProfileUpdate>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.update_profile(&UserId(user_id), update) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => directory_error_response(error),
    }
}

pub(crate) async fn list_users_handler<U, V>(
    State(service): State<Arc<DirectoryService<U, V>>>,
    Query(params): Query<UserListParams>,
) -> Response
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.list_users(params.into_query()) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => directory_error_response(error),
    }
}

pub(crate) fn directory_error_response(error: DirectoryError) -> Response {
    let status = match &error {
        DirectoryError::EmailTaken(_) => StatusCode::CONFLICT,
        DirectoryError::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
        DirectoryError::UserNotFound => StatusCode::NOT_FOUND,
        DirectoryError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DirectoryError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DirectoryError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
