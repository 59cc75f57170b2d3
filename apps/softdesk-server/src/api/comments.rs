//! Comment endpoints.

use std::sync::Arc;

use api_protocol::{CommentView, requests::*, responses::*};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use entities::{Comment, CommentId, IssueId, ProjectId};
use tracker_store::{CommentFilter, TrackerStore};

use crate::error::ServerResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthenticatedUser;
use crate::policy;
use crate::scope::{find_project, issue_comment, project_issue, visible_project};
use crate::state::AppState;
use crate::validation::{self, FieldErrors};

pub async fn list_comments<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id)): ApiPath<(ProjectId, IssueId)>,
    Query(query): Query<ListQuery>,
) -> ServerResult<Json<ListCommentsResponse>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    let issue = project_issue(&state.store, &project, issue_id).await?;

    let filter = CommentFilter {
        issue_id: Some(issue.id),
        limit: query.limit,
        offset: query.offset,
    };
    let (comments, total_count) = state.store.list_comments(filter).await?;

    Ok(Json(ListCommentsResponse {
        comments: comments.iter().map(CommentView::from).collect(),
        total_count,
    }))
}

pub async fn create_comment<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id)): ApiPath<(ProjectId, IssueId)>,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> ServerResult<(StatusCode, Json<CommentView>)> {
    let project = find_project(&state.store, project_id).await?;
    let issue = project_issue(&state.store, &project, issue_id).await?;
    policy::create_comment(requester.id, &project).enforce(requester.id)?;

    let mut errors = FieldErrors::new();
    validation::comment(&mut errors, &request.description);
    errors.finish()?;

    let comment = state
        .store
        .create_comment(Comment::new(issue.id, requester.id, request.description))
        .await?;

    tracing::info!(comment_id = %comment.id, issue_id = %issue.id, "Comment created");

    Ok((StatusCode::CREATED, Json(CommentView::from(&comment))))
}

pub async fn get_comment<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id, comment_id)): ApiPath<(ProjectId, IssueId, CommentId)>,
) -> ServerResult<Json<CommentView>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    let issue = project_issue(&state.store, &project, issue_id).await?;
    let comment = issue_comment(&state.store, &issue, comment_id).await?;

    Ok(Json(CommentView::from(&comment)))
}

pub async fn update_comment<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id, comment_id)): ApiPath<(ProjectId, IssueId, CommentId)>,
    ApiJson(request): ApiJson<UpdateCommentRequest>,
) -> ServerResult<Json<CommentView>> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    let issue = project_issue(&state.store, &project, issue_id).await?;
    let mut comment = issue_comment(&state.store, &issue, comment_id).await?;
    policy::modify_comment(requester.id, &project, &comment).enforce(requester.id)?;

    let mut errors = FieldErrors::new();
    validation::comment(&mut errors, &request.description);
    errors.finish()?;

    comment.description = request.description;
    let comment = state.store.update_comment(comment).await?;

    tracing::info!(comment_id = %comment.id, "Comment updated");

    Ok(Json(CommentView::from(&comment)))
}

pub async fn delete_comment<S: TrackerStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: AuthenticatedUser,
    ApiPath((project_id, issue_id, comment_id)): ApiPath<(ProjectId, IssueId, CommentId)>,
) -> ServerResult<StatusCode> {
    let project = visible_project(&state.store, project_id, requester.id).await?;
    let issue = project_issue(&state.store, &project, issue_id).await?;
    let comment = issue_comment(&state.store, &issue, comment_id).await?;
    policy::modify_comment(requester.id, &project, &comment).enforce(requester.id)?;

    state.store.delete_comment(comment.id).await?;

    tracing::info!(comment_id = %comment.id, issue_id = %issue.id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
