//! Resource representations returned by the API.

use chrono::{DateTime, Utc};
use entities::{
    Comment, CommentId, Issue, IssueId, IssuePriority, IssueStatus, IssueType, Project,
    ProjectCategory, ProjectId, User, UserId,
};
use serde::{Deserialize, Serialize};

/// Public view of an account. The password hash and staff flag are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            age: user.age,
            can_be_contacted: user.can_be_contacted,
            can_data_be_shared: user.can_data_be_shared,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectView {
    pub id: ProjectId,
    pub author: UserId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: ProjectCategory,
    pub created_time: DateTime<Utc>,
    pub contributors: Vec<UserId>,
}

impl From<&Project> for ProjectView {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            author: project.author_id,
            name: project.name.clone(),
            description: project.description.clone(),
            category: project.category,
            created_time: project.created_at,
            contributors: project.contributors.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueView {
    pub id: IssueId,
    pub project: ProjectId,
    pub author: Option<UserId>,
    pub assigned_to: Option<UserId>,
    pub name: String,
    pub description: String,
    pub priority: IssuePriority,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub status: IssueStatus,
    pub created_time: DateTime<Utc>,
}

impl From<&Issue> for IssueView {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id,
            project: issue.project_id,
            author: issue.author_id,
            assigned_to: issue.assigned_to,
            name: issue.name.clone(),
            description: issue.description.clone(),
            priority: issue.priority,
            issue_type: issue.issue_type,
            status: issue.status,
            created_time: issue.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub issue: IssueId,
    pub author: Option<UserId>,
    pub description: String,
    pub created_time: DateTime<Utc>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            issue: comment.issue_id,
            author: comment.author_id,
            description: comment.description.clone(),
            created_time: comment.created_at,
        }
    }
}
