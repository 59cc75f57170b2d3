//! Issue endpoints.

use std::sync::Arc;

use api_protocol::{IssueView, requests::*, responses::*};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use entities::{IssueId, NewIssue, Project, ProjectId};
use tracker_store::{IssueFilter, TrackerStore};

use crate::error::ServerResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthenticatedUser;
use crate::policy;
use crate::scope::{find_project, project_issue, visible_project};
use crate::state::AppState;
use crate::validation::{self, FieldErrors};

fn validate(project: &Project, request: &CreateIssueRequest) -> ServerResult<()> {
    let mut errors = FieldErrors::new();
    validation::issue(&mut errors, &request.name, &request.description);
    validation::assignee(&mut errors, project, request.assigned_to);
    errors.finish()
}

pub async fn list_issues<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(project_id): ApiPath<ProjectId>,
    Query(query): Query<ListQuery>,
) -> ServerResult<Json<ListIssuesResponse>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;

    let filter = IssueFilter {
        project_id: Some(project.id),
        limit: query.limit,
        offset: query.offset,
    };
    let (issues, total_count) = state.store.list_issues(filter).await?;

    Ok(Json(ListIssuesResponse {
        issues: issues.iter().map(IssueView::from).collect(),
        total_count,
    }))
}

/// Opens an issue on a project the caller contributes to.
pub async fn create_issue<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath(project_id): ApiPath<ProjectId>,
    ApiJson(request): ApiJson<CreateIssueRequest>,
) -> ServerResult<(StatusCode, Json<IssueView>)> {
    let project = find_project(&state.store, project_id).await?;
    policy::create_issue(requester.id, &project).enforce(requester.id)?;
    validate(&project, &request)?;

    let new_issue = NewIssue::new(
        project.id,
        requester.id,
        request.name,
        request.priority,
        request.issue_type,
    )
    .with_description(request.description)
    .with_assignee(request.assigned_to)
    .with_status(request.status);
    let issue = state.store.create_issue(new_issue).await?;

    tracing::info!(
        issue_id = %issue.id,
        project_id = %project.id,
        author_id = %requester.id,
        "Issue created"
    );

    Ok((StatusCode::CREATED, Json(IssueView::from(&issue))))
}

pub async fn get_issue<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id)): ApiPath<(ProjectId, IssueId)>,
) -> ServerResult<Json<IssueView>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    let issue = project_issue(&state.store, &project, issue_id).await?;

    Ok(Json(IssueView::from(&issue)))
}

pub async fn update_issue<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id)): ApiPath<(ProjectId, IssueId)>,
    ApiJson(request): ApiJson<UpdateIssueRequest>,
) -> ServerResult<Json<IssueView>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    let mut issue = project_issue(&state.store, &project, issue_id).await?;
    policy::modify_issue(requester.id, &project, &issue).enforce(requester.id)?;
    validate(&project, &request)?;

    issue.name = request.name;
    issue.description = request.description;
    issue.priority = request.priority;
    issue.issue_type = request.issue_type;
    issue.status = request.status;
    issue.assigned_to = request.assigned_to;
    let issue = state.store.update_issue(issue).await?;

    tracing::info!(issue_id = %issue.id, status = ?issue.status, "Issue updated");

    Ok(Json(IssueView::from(&issue)))
}

/// Deletes an issue with its comments.
pub async fn delete_issue<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id)): ApiPath<(ProjectId, IssueId)>,
) -> ServerResult<StatusCode> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    let issue = project_issue(&state.store, &project, issue_id).await?;
    policy::modify_issue(requester.id, &project, &issue).enforce(requester.id)?;

    state.store.delete_issue(issue.id).await?;

    tracing::info!(issue_id = %issue.id, project_id = %project.id, "Issue deleted");

    Ok(StatusCode::NO_CONTENT)
}
