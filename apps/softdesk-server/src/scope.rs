//! Resource lookups scoped to what a requester may see.
//!
//! Reads go through the `visible_*` functions so that resources outside the
//! requester's projects are indistinguishable from missing ones. Creation
//! endpoints use the unscoped `find_*` lookups and leave membership to the
//! policy, which answers 403 instead.

use entities::{Comment, CommentId, Issue, IssueId, Project, ProjectId, User, UserId};
use tracker_store::TrackerStore;

use crate::error::{ServerError, ServerResult};

fn not_found(entity: &str) -> ServerError {
    ServerError::NotFound(format!("{entity} not found"))
}

pub async fn find_user<S: TrackerStore>(store: &S, user_id: UserId) -> ServerResult<User> {
    store
        .get_user(user_id)
        .await?
        .ok_or_else(|| not_found("User"))
}

/// Looks an account up through the public directory, which omits staff.
pub async fn directory_user<S: TrackerStore>(store: &S, user_id: UserId) -> ServerResult<User> {
    store
        .get_user(user_id)
        .await?
        .filter(|user| !user.is_staff)
        .ok_or_else(|| not_found("User"))
}

/// Looks a project up regardless of membership.
pub async fn find_project<S: TrackerStore>(store: &S, project_id: ProjectId) -> ServerResult<Project> {
    store
        .get_project(project_id)
        .await?
        .ok_or_else(|| not_found("Project"))
}

/// Looks a project up among those the requester contributes to.
pub async fn visible_project<S: TrackerStore>(
    store: &S,
    project_id: ProjectId,
    requester: UserId,
) -> ServerResult<Project> {
    store
        .get_project(project_id)
        .await?
        .filter(|project| project.is_contributor(requester))
        .ok_or_else(|| not_found("Project"))
}

/// Looks an issue up within a project already resolved for the requester.
pub async fn project_issue<S: TrackerStore>(
    store: &S,
    project: &Project,
    issue_id: IssueId,
) -> ServerResult<Issue> {
    store
        .get_issue(issue_id)
        .await?
        .filter(|issue| issue.project_id == project.id)
        .ok_or_else(|| not_found("Issue"))
}

/// Looks a comment up within an issue already resolved for the requester.
pub async fn issue_comment<S: TrackerStore>(
    store: &S,
    issue: &Issue,
    comment_id: CommentId,
) -> ServerResult<Comment> {
    store
        .get_comment(comment_id)
        .await?
        .filter(|comment| comment.issue_id == issue.id)
        .ok_or_else(|| not_found("Comment"))
}
