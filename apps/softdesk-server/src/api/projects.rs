//! Project endpoints.

use std::sync::Arc;

use api_protocol::{ProjectView, requests::*, responses::*};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use entities::{NewProject, ProjectId};
use tracker_store::{ProjectFilter, TrackerStore};

use crate::error::ServerResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthenticatedUser;
use crate::policy;
use crate::scope::visible_project;
use crate::state::AppState;
use crate::validation::{self, FieldErrors};

/// Creates a project owned by the caller.
pub async fn create_project<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiJson(request): ApiJson<CreateProjectRequest>,
) -> ServerResult<(StatusCode, Json<ProjectView>)> {
    let mut errors = FieldErrors::new();
    validation::project(&mut errors, &request.name, &request.description);
    errors.finish()?;

    let project = state
        .store
        .create_project(
            NewProject::new(requester.id, request.name, request.category)
                .with_description(request.description),
        )
        .await?;

    tracing::info!(project_id = %project.id, author_id = %requester.id, "Project created");

    Ok((StatusCode::CREATED, Json(ProjectView::from(&project))))
}

/// Lists the projects the caller contributes to.
pub async fn list_projects<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> ServerResult<Json<ListProjectsResponse>> {
    let filter = ProjectFilter {
        contributor_id: Some(requester.id),
        limit: query.limit,
        offset: query.offset,
    };
    let (projects, total_count) = state.store.list_projects(filter).await?;

    Ok(Json(ListProjectsResponse {
        projects: projects.iter().map(ProjectView::from).collect(),
        total_count,
    }))
}

pub async fn get_project<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> ServerResult<Json<ProjectView>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;

    Ok(Json(ProjectView::from(&project)))
}

pub async fn update_project<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(project_id): ApiPath<ProjectId>,
    ApiJson(request): ApiJson<UpdateProjectRequest>,
) -> ServerResult<Json<ProjectView>> {
    let mut project = visible_project(&state.store, project_id, requester.id).await?;
    policy::modify_project(requester.id, &project).enforce(requester.id)?;

    let mut errors = FieldErrors::new();
    validation::project(&mut errors, &request.name, &request.description);
    errors.finish()?;

    project.name = request.name;
    project.description = request.description;
    project.category = request.category;
    let project = state.store.update_project(project).await?;

    tracing::info!(project_id = %project.id, "Project updated");

    Ok(Json(ProjectView::from(&project)))
}

/// Deletes a project with its issues and comments.
pub async fn delete_project<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> ServerResult<StatusCode> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    policy::modify_project(requester.id, &project).enforce(requester.id)?;

    state.store.delete_project(project.id).await?;

    tracing::info!(project_id = %project.id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}
