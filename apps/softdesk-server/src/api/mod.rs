//! API endpoints.

pub mod comments;
pub mod contributors;
pub mod issues;
pub mod projects;
pub mod token;
pub mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tracker_store::TrackerStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: TrackerStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Account endpoints
        .route(
            "/api/users",
            get(users::list_users::<S>).post(users::register_user::<S>),
        )
        .route(
            "/api/users/:user_id",
            get(users::get_user::<S>)
                .put(users::update_user::<S>)
                .delete(users::delete_user::<S>),
        )
        // Token endpoints
        .route("/api/token", post(token::obtain_token::<S>))
        .route("/api/token/refresh", post(token::refresh_token::<S>))
        // Project endpoints
        .route(
            "/api/projects",
            get(projects::list_projects::<S>).post(projects::create_project::<S>),
        )
        .route(
            "/api/projects/:project_id",
            get(projects::get_project::<S>)
                .put(projects::update_project::<S>)
                .delete(projects::delete_project::<S>),
        )
        // Membership endpoints
        .route(
            "/api/projects/:project_id/contributors",
            get(contributors::list_contributors::<S>).post(contributors::add_contributor::<S>),
        )
        .route(
            "/api/projects/:project_id/contributors/:user_id",
            delete(contributors::remove_contributor::<S>),
        )
        // Issue endpoints
        .route(
            "/api/projects/:project_id/issues",
            get(issues::list_issues::<S>).post(issues::create_issue::<S>),
        )
        .route(
            "/api/projects/:project_id/issues/:issue_id",
            get(issues::get_issue::<S>)
                .put(issues::update_issue::<S>)
                .delete(issues::delete_issue::<S>),
        )
        // Comment endpoints
        .route(
            "/api/projects/:project_id/issues/:issue_id/comments",
            get(comments::list_comments::<S>).post(comments::create_comment::<S>),
        )
        .route(
            "/api/projects/:project_id/issues/:issue_id/comments/:comment_id",
            get(comments::get_comment::<S>)
                .put(comments::update_comment::<S>)
                .delete(comments::delete_comment::<S>),
        )
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
