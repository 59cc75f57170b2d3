//! Issue entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IssueId, ProjectId, UserId};

/// Priority of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
}

/// Kind of work an issue describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Bug,
    Feature,
    Task,
}

/// Progress of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Done.
    Finished,
}

/// An issue raised within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier.
    pub id: IssueId,
    /// Parent project. Never changes after creation.
    pub project_id: ProjectId,
    /// Creator, cleared when the account is deleted.
    pub author_id: Option<UserId>,
    /// Contributor in charge, validated when set.
    pub assigned_to: Option<UserId>,
    /// Short title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Priority.
    pub priority: IssuePriority,
    /// Kind of work.
    pub issue_type: IssueType,
    /// Progress.
    pub status: IssueStatus,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Issue {
    /// Returns true if the user wrote this issue.
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.author_id == Some(user_id)
    }
}

/// Data required to create an issue. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub project_id: ProjectId,
    pub author_id: UserId,
    pub assigned_to: Option<UserId>,
    pub name: String,
    pub description: String,
    pub priority: IssuePriority,
    pub issue_type: IssueType,
    pub status: IssueStatus,
}

impl NewIssue {
    /// Creates issue data with status `todo` and no assignee.
    pub fn new(
        project_id: ProjectId,
        author_id: UserId,
        name: impl Into<String>,
        priority: IssuePriority,
        issue_type: IssueType,
    ) -> Self {
        Self {
            project_id,
            author_id,
            assigned_to: None,
            name: name.into(),
            description: String::new(),
            priority,
            issue_type,
            status: IssueStatus::default(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the assignee.
    pub fn with_assignee(mut self, assigned_to: Option<UserId>) -> Self {
        self.assigned_to = assigned_to;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    /// Builds the stored record.
    pub fn into_issue(self, id: IssueId) -> Issue {
        Issue {
            id,
            project_id: self.project_id,
            author_id: Some(self.author_id),
            assigned_to: self.assigned_to,
            name: self.name,
            description: self.description,
            priority: self.priority,
            issue_type: self.issue_type,
            status: self.status,
            created_at: Utc::now(),
        }
    }
}
