//! Tracker store trait definitions.

use async_trait::async_trait;
use entities::{
    Comment, CommentId, Issue, IssueId, NewIssue, NewProject, NewUser, Project, ProjectId, User,
    UserId,
};

use crate::StoreResult;

/// Filter options for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Only members of this project.
    pub member_of: Option<ProjectId>,
    /// Include administrative accounts.
    pub include_staff: bool,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

/// Filter options for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Only projects this user contributes to.
    pub contributor_id: Option<UserId>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

/// Filter options for listing issues.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Filter by project ID.
    pub project_id: Option<ProjectId>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

/// Filter options for listing comments.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    /// Filter by issue ID.
    pub issue_id: Option<IssueId>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

/// Trait for tracker storage operations.
///
/// Every call is applied atomically. Cascading deletes are part of the
/// contract: implementations must not leave dangling references behind.
#[async_trait]
pub trait TrackerStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a user. Fails with `AlreadyExists` if the username is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Gets a user by username.
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Lists users ordered by id.
    async fn list_users(&self, filter: UserFilter) -> StoreResult<(Vec<User>, u32)>;

    /// Replaces a user's record. Fails with `AlreadyExists` if the new
    /// username belongs to another account.
    async fn update_user(&self, user: User) -> StoreResult<User>;

    /// Deletes a user.
    ///
    /// Projects authored by the user are deleted with their issues and
    /// comments. The user leaves every contributor set, and authorship and
    /// assignment references elsewhere are cleared.
    async fn delete_user(&self, id: UserId) -> StoreResult<()>;

    // =========================================================================
    // Project operations
    // =========================================================================

    /// Creates a project with its author as the only contributor.
    async fn create_project(&self, project: NewProject) -> StoreResult<Project>;

    /// Gets a project by ID.
    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>>;

    /// Lists projects ordered by id.
    async fn list_projects(&self, filter: ProjectFilter) -> StoreResult<(Vec<Project>, u32)>;

    /// Updates name, description and category. Author and contributors are
    /// kept as stored.
    async fn update_project(&self, project: Project) -> StoreResult<Project>;

    /// Deletes a project together with its issues and their comments.
    async fn delete_project(&self, id: ProjectId) -> StoreResult<()>;

    /// Adds a contributor. Returns false if the user already was one.
    async fn add_contributor(&self, project_id: ProjectId, user_id: UserId) -> StoreResult<bool>;

    /// Removes a contributor. Returns false if the user was not one.
    /// Existing issue assignments are left untouched.
    async fn remove_contributor(&self, project_id: ProjectId, user_id: UserId)
        -> StoreResult<bool>;

    // =========================================================================
    // Issue operations
    // =========================================================================

    /// Creates an issue.
    async fn create_issue(&self, issue: NewIssue) -> StoreResult<Issue>;

    /// Gets an issue by ID.
    async fn get_issue(&self, id: IssueId) -> StoreResult<Option<Issue>>;

    /// Lists issues ordered by id.
    async fn list_issues(&self, filter: IssueFilter) -> StoreResult<(Vec<Issue>, u32)>;

    /// Updates an issue. Project, author and creation time are kept as stored.
    async fn update_issue(&self, issue: Issue) -> StoreResult<Issue>;

    /// Deletes an issue together with its comments.
    async fn delete_issue(&self, id: IssueId) -> StoreResult<()>;

    // =========================================================================
    // Comment operations
    // =========================================================================

    /// Creates a comment.
    async fn create_comment(&self, comment: Comment) -> StoreResult<Comment>;

    /// Gets a comment by ID.
    async fn get_comment(&self, id: CommentId) -> StoreResult<Option<Comment>>;

    /// Lists comments ordered by creation time.
    async fn list_comments(&self, filter: CommentFilter) -> StoreResult<(Vec<Comment>, u32)>;

    /// Updates a comment's description.
    async fn update_comment(&self, comment: Comment) -> StoreResult<Comment>;

    /// Deletes a comment.
    async fn delete_comment(&self, id: CommentId) -> StoreResult<()>;
}
