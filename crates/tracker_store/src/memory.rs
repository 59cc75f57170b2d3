//! In-memory tracker store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use entities::{
    Comment, CommentId, Issue, IssueId, NewIssue, NewProject, NewUser, Project, ProjectId, User,
    UserId,
};
use tokio::sync::RwLock;

use crate::{
    CommentFilter, IssueFilter, ProjectFilter, StoreError, StoreResult, TrackerStore, UserFilter,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    projects: BTreeMap<ProjectId, Project>,
    issues: BTreeMap<IssueId, Issue>,
    comments: HashMap<CommentId, Comment>,
    last_user_id: i64,
    last_project_id: i64,
    last_issue_id: i64,
}

impl Tables {
    fn next_user_id(&mut self) -> UserId {
        self.last_user_id += 1;
        UserId(self.last_user_id)
    }

    fn next_project_id(&mut self) -> ProjectId {
        self.last_project_id += 1;
        ProjectId(self.last_project_id)
    }

    fn next_issue_id(&mut self) -> IssueId {
        self.last_issue_id += 1;
        IssueId(self.last_issue_id)
    }

    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn remove_issue_cascade(&mut self, id: IssueId) -> bool {
        if self.issues.remove(&id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.issue_id != id);
        true
    }

    fn remove_project_cascade(&mut self, id: ProjectId) -> bool {
        if self.projects.remove(&id).is_none() {
            return false;
        }
        let issue_ids: Vec<IssueId> = self
            .issues
            .values()
            .filter(|i| i.project_id == id)
            .map(|i| i.id)
            .collect();
        for issue_id in issue_ids {
            self.remove_issue_cascade(issue_id);
        }
        true
    }
}

/// Applies offset and limit, returning the page and the unpaginated total.
fn paginate<T>(items: Vec<T>, offset: Option<u32>, limit: Option<u32>) -> (Vec<T>, u32) {
    let total = items.len() as u32;
    let page = items
        .into_iter()
        .skip(offset.unwrap_or(0) as usize)
        .take(limit.map_or(usize::MAX, |l| l as usize))
        .collect();
    (page, total)
}

/// In-memory tracker store.
///
/// All tables live behind one lock so that cascades and membership changes
/// are applied as a single step.
#[derive(Debug, Default)]
pub struct MemoryTrackerStore {
    tables: RwLock<Tables>,
}

impl MemoryTrackerStore {
    /// Creates a new in-memory tracker store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackerStore for MemoryTrackerStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&user.username, None) {
            return Err(StoreError::already_exists("User", &user.username));
        }
        let id = tables.next_user_id();
        let user = user.into_user(id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self, filter: UserFilter) -> StoreResult<(Vec<User>, u32)> {
        let tables = self.tables.read().await;
        let members = match filter.member_of {
            Some(project_id) => match tables.projects.get(&project_id) {
                Some(project) => Some(&project.contributors),
                None => return Ok((Vec::new(), 0)),
            },
            None => None,
        };
        let users: Vec<User> = tables
            .users
            .values()
            .filter(|u| filter.include_staff || !u.is_staff)
            .filter(|u| members.is_none_or(|m| m.contains(u.id)))
            .cloned()
            .collect();

        Ok(paginate(users, filter.offset, filter.limit))
    }

    async fn update_user(&self, mut user: User) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(StoreError::not_found("User", user.id));
        }
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(StoreError::already_exists("User", &user.username));
        }
        user.updated_at = Utc::now();
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(StoreError::not_found("User", id));
        }

        let owned: Vec<ProjectId> = tables
            .projects
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for project_id in &owned {
            tables.remove_project_cascade(*project_id);
        }

        for project in tables.projects.values_mut() {
            project.contributors.remove(id);
        }
        for issue in tables.issues.values_mut() {
            if issue.author_id == Some(id) {
                issue.author_id = None;
            }
            if issue.assigned_to == Some(id) {
                issue.assigned_to = None;
            }
        }
        for comment in tables.comments.values_mut() {
            if comment.author_id == Some(id) {
                comment.author_id = None;
            }
        }

        tracing::debug!(user_id = %id, owned_projects = owned.len(), "User removed from store");
        Ok(())
    }

    // =========================================================================
    // Project operations
    // =========================================================================

    async fn create_project(&self, project: NewProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&project.author_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "project author {} does not exist",
                project.author_id
            )));
        }
        let id = tables.next_project_id();
        let project = project.into_project(id);
        tables.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.get(&id).cloned())
    }

    async fn list_projects(&self, filter: ProjectFilter) -> StoreResult<(Vec<Project>, u32)> {
        let tables = self.tables.read().await;
        let projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| match filter.contributor_id {
                Some(user_id) => p.is_contributor(user_id),
                None => true,
            })
            .cloned()
            .collect();

        Ok(paginate(projects, filter.offset, filter.limit))
    }

    async fn update_project(&self, project: Project) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| StoreError::not_found("Project", project.id))?;
        stored.name = project.name;
        stored.description = project.description;
        stored.category = project.category;
        Ok(stored.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.remove_project_cascade(id) {
            return Err(StoreError::not_found("Project", id));
        }
        Ok(())
    }

    async fn add_contributor(&self, project_id: ProjectId, user_id: UserId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "contributor {user_id} does not exist"
            )));
        }
        let project = tables
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| StoreError::not_found("Project", project_id))?;
        Ok(project.contributors.add(user_id))
    }

    async fn remove_contributor(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let project = tables
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| StoreError::not_found("Project", project_id))?;
        Ok(project.contributors.remove(user_id))
    }

    // =========================================================================
    // Issue operations
    // =========================================================================

    async fn create_issue(&self, issue: NewIssue) -> StoreResult<Issue> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&issue.project_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "project {} does not exist",
                issue.project_id
            )));
        }
        let id = tables.next_issue_id();
        let issue = issue.into_issue(id);
        tables.issues.insert(id, issue.clone());
        Ok(issue)
    }

    async fn get_issue(&self, id: IssueId) -> StoreResult<Option<Issue>> {
        let tables = self.tables.read().await;
        Ok(tables.issues.get(&id).cloned())
    }

    async fn list_issues(&self, filter: IssueFilter) -> StoreResult<(Vec<Issue>, u32)> {
        let tables = self.tables.read().await;
        let issues: Vec<Issue> = tables
            .issues
            .values()
            .filter(|i| match filter.project_id {
                Some(project_id) => i.project_id == project_id,
                None => true,
            })
            .cloned()
            .collect();

        Ok(paginate(issues, filter.offset, filter.limit))
    }

    async fn update_issue(&self, issue: Issue) -> StoreResult<Issue> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .issues
            .get_mut(&issue.id)
            .ok_or_else(|| StoreError::not_found("Issue", issue.id))?;
        stored.assigned_to = issue.assigned_to;
        stored.name = issue.name;
        stored.description = issue.description;
        stored.priority = issue.priority;
        stored.issue_type = issue.issue_type;
        stored.status = issue.status;
        Ok(stored.clone())
    }

    async fn delete_issue(&self, id: IssueId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.remove_issue_cascade(id) {
            return Err(StoreError::not_found("Issue", id));
        }
        Ok(())
    }

    // =========================================================================
    // Comment operations
    // =========================================================================

    async fn create_comment(&self, comment: Comment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.issues.contains_key(&comment.issue_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "issue {} does not exist",
                comment.issue_id
            )));
        }
        if tables.comments.contains_key(&comment.id) {
            return Err(StoreError::already_exists("Comment", comment.id));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: CommentId) -> StoreResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&id).cloned())
    }

    async fn list_comments(&self, filter: CommentFilter) -> StoreResult<(Vec<Comment>, u32)> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| match filter.issue_id {
                Some(issue_id) => c.issue_id == issue_id,
                None => true,
            })
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        Ok(paginate(comments, filter.offset, filter.limit))
    }

    async fn update_comment(&self, comment: Comment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .comments
            .get_mut(&comment.id)
            .ok_or_else(|| StoreError::not_found("Comment", comment.id))?;
        stored.description = comment.description;
        Ok(stored.clone())
    }

    async fn delete_comment(&self, id: CommentId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(StoreError::not_found("Comment", id));
        }
        Ok(())
    }
}
