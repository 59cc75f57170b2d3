//! Account endpoints.

use std::sync::Arc;

use api_protocol::{UserView, requests::*, responses::*};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use entities::{NewUser, UserId};
use tracker_store::{StoreError, TrackerStore, UserFilter};

use crate::api::token::hash_password;
use crate::error::{ServerError, ServerResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthenticatedUser;
use crate::policy;
use crate::scope::directory_user;
use crate::state::AppState;
use crate::validation::{self, FieldErrors};

fn username_taken(err: StoreError) -> ServerError {
    match err {
        StoreError::AlreadyExists { .. } => {
            ServerError::invalid_field("username", "A user with that username already exists.")
        }
        other => other.into(),
    }
}

/// Registers a new account. Open to anonymous callers.
pub async fn register_user<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(request): ApiJson<RegisterUserRequest>,
) -> ServerResult<(StatusCode, Json<UserView>)> {
    let mut errors = FieldErrors::new();
    validation::user_profile(&mut errors, &request.username, request.age);
    validation::password(&mut errors, &request.password);
    errors.finish()?;

    let password_hash = hash_password(request.password).await?;
    let new_user = NewUser::new(request.username, request.age, password_hash)
        .with_names(request.first_name, request.last_name)
        .with_consents(request.can_be_contacted, request.can_data_be_shared);

    let user = state
        .store
        .create_user(new_user)
        .await
        .map_err(username_taken)?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

/// Lists accounts. Staff accounts are not listed.
pub async fn list_users<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    _requester: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> ServerResult<Json<ListUsersResponse>> {
    let filter = UserFilter {
        limit: query.limit,
        offset: query.offset,
        ..Default::default()
    };
    let (users, total_count) = state.store.list_users(filter).await?;

    Ok(Json(ListUsersResponse {
        users: users.iter().map(UserView::from).collect(),
        total_count,
    }))
}

pub async fn get_user<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
) -> ServerResult<Json<UserView>> {
    let user = directory_user(&state.store, user_id).await?;
    policy::manage_account(requester.id, &user).enforce(requester.id)?;

    Ok(Json(UserView::from(&user)))
}

/// Replaces the caller's own profile.
pub async fn update_user<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ServerResult<Json<UserView>> {
    let mut user = directory_user(&state.store, user_id).await?;
    policy::manage_account(requester.id, &user).enforce(requester.id)?;

    let mut errors = FieldErrors::new();
    validation::user_profile(&mut errors, &request.username, request.age);
    if let Some(password) = &request.password {
        validation::password(&mut errors, password);
    }
    errors.finish()?;

    if let Some(password) = request.password {
        user.password_hash = hash_password(password).await?;
    }
    user.username = request.username;
    user.first_name = request.first_name;
    user.last_name = request.last_name;
    user.age = request.age;
    user.can_be_contacted = request.can_be_contacted;
    user.can_data_be_shared = request.can_data_be_shared;

    let user = state
        .store
        .update_user(user)
        .await
        .map_err(username_taken)?;

    tracing::info!(user_id = %user.id, "User updated");

    Ok(Json(UserView::from(&user)))
}

/// Deletes the caller's own account together with the projects it owns.
pub async fn delete_user<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
) -> ServerResult<StatusCode> {
    let user = directory_user(&state.store, user_id).await?;
    policy::manage_account(requester.id, &user).enforce(requester.id)?;

    state.store.delete_user(user.id).await?;

    tracing::info!(user_id = %user.id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
