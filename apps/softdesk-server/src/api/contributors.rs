//! Project membership endpoints.

use std::sync::Arc;

use api_protocol::{UserView, requests::*, responses::*};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use entities::{ProjectId, UserId};
use tracker_store::{TrackerStore, UserFilter};

use crate::error::{ServerError, ServerResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthenticatedUser;
use crate::policy;
use crate::scope::{find_project, find_user, visible_project};
use crate::state::AppState;

pub async fn list_contributors<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(project_id): ApiPath<ProjectId>,
    Query(query): Query<ListQuery>,
) -> ServerResult<Json<ListContributorsResponse>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;

    let filter = UserFilter {
        member_of: Some(project.id),
        include_staff: true,
        limit: query.limit,
        offset: query.offset,
    };
    let (users, total_count) = state.store.list_users(filter).await?;

    Ok(Json(ListContributorsResponse {
        contributors: users.iter().map(UserView::from).collect(),
        total_count,
    }))
}

/// Adds a member to a project. Adding an existing member changes nothing.
pub async fn add_contributor<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(project_id): ApiPath<ProjectId>,
    ApiJson(request): ApiJson<AddContributorRequest>,
) -> ServerResult<(StatusCode, Json<UserView>)> {
    let project = find_project(&state.store, project_id).await?;
    policy::manage_contributors(requester.id, &project).enforce(requester.id)?;

    let user = find_user(&state.store, request.user_id).await?;
    let added = state.store.add_contributor(project.id, user.id).await?;

    if added {
        tracing::info!(project_id = %project.id, user_id = %user.id, "Contributor added");
    } else {
        tracing::debug!(project_id = %project.id, user_id = %user.id, "Contributor already present");
    }

    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

/// Removes a member from a project. Removing an existing account that is
/// not a member changes nothing.
pub async fn remove_contributor<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, user_id)): ApiPath<(ProjectId, UserId)>,
) -> ServerResult<StatusCode> {
    let project = find_project(&state.store, project_id).await?;
    policy::manage_contributors(requester.id, &project).enforce(requester.id)?;

    let user = find_user(&state.store, user_id).await?;
    if project.is_author(user.id) {
        return Err(ServerError::invalid_field(
            "user_id",
            "The project author cannot be removed from the contributors.",
        ));
    }

    if state.store.remove_contributor(project.id, user.id).await? {
        tracing::info!(project_id = %project.id, user_id = %user.id, "Contributor removed");
    }

    Ok(StatusCode::NO_CONTENT)
}
